//! Input-queue replay: folds the unread tail of a player's input queue into a
//! single transform/orientation result.
//!
//! The host keeps an ordered, append-only queue of [`InputUpdate`]s per
//! player. Each camera record remembers how far it has read (its replay
//! cursor), so every event is applied exactly once.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::transform::{Orientation, Transform};

/// One entry of a player's input queue.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputUpdate {
    /// Replace the position outright.
    AbsoluteMovement(DVec3),
    /// Add a delta to the position.
    RelativeMovement(DVec3),
    /// Local-space movement intent: x = strafe, y = vertical, z = forward.
    WishMovement(DVec3),
    /// New head orientation.
    SetHead(Orientation),
    /// New body orientation.
    SetBody(Orientation),
}

/// Result of replaying the unread part of an input queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSnapshot {
    /// Base transform with absolute/relative movement applied.
    pub transform: Transform,
    /// Last orientation seen, or the base orientation.
    pub orientation: Orientation,
    /// Cursor to store for the next read (the queue length).
    pub next_index: usize,
    /// At least one absolute or relative movement was applied.
    pub has_movement: bool,
    /// Last wish-movement vector seen, if any. Not integrated here.
    pub wish: Option<DVec3>,
    /// Number of `SetHead` events replayed.
    pub set_head_updates: u32,
    /// Number of `SetBody` events replayed.
    pub set_body_updates: u32,
}

impl InputSnapshot {
    /// `true` when the replayed range carried a wish-movement intent.
    pub fn has_wish_movement(&self) -> bool {
        self.wish.is_some()
    }
}

/// Replays `updates[cursor..]` on top of `base_transform`/`base_orientation`.
///
/// Returns `None` when there is nothing new to read: the queue is empty or
/// the cursor already covers it. A cursor past the end of a shrunken queue
/// is treated as covering it.
pub fn read_input_snapshot(
    base_transform: Transform,
    base_orientation: Orientation,
    updates: &[InputUpdate],
    cursor: usize,
) -> Option<InputSnapshot> {
    let start = cursor.min(updates.len());
    let unread = &updates[start..];
    if unread.is_empty() {
        return None;
    }

    let mut snapshot = InputSnapshot {
        transform: base_transform,
        orientation: base_orientation,
        next_index: updates.len(),
        has_movement: false,
        wish: None,
        set_head_updates: 0,
        set_body_updates: 0,
    };

    for update in unread {
        match *update {
            InputUpdate::AbsoluteMovement(position) => {
                snapshot.transform = Transform::from(position);
                snapshot.has_movement = true;
            }
            InputUpdate::RelativeMovement(delta) => {
                snapshot.transform = snapshot.transform.translated(delta);
                snapshot.has_movement = true;
            }
            InputUpdate::WishMovement(wish) => {
                snapshot.wish = Some(wish);
            }
            InputUpdate::SetHead(orientation) => {
                snapshot.orientation = orientation;
                snapshot.set_head_updates += 1;
            }
            InputUpdate::SetBody(orientation) => {
                snapshot.orientation = orientation;
                snapshot.set_body_updates += 1;
            }
        }
    }

    Some(snapshot)
}

/// Orientation-only replay used while the camera is frozen on a tripod.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationReplay {
    /// Last head/body orientation seen, if any.
    pub orientation: Option<Orientation>,
    /// Number of `SetHead` events replayed.
    pub set_head_updates: u32,
    /// Number of `SetBody` events replayed.
    pub set_body_updates: u32,
    /// Cursor to store for the next read.
    pub next_index: usize,
}

/// Scans `updates[cursor..]` for head and body orientation changes, ignoring
/// movement. The returned cursor never moves backwards.
pub fn replay_orientation(updates: &[InputUpdate], cursor: usize) -> OrientationReplay {
    let start = cursor.min(updates.len());
    let mut replay = OrientationReplay {
        orientation: None,
        set_head_updates: 0,
        set_body_updates: 0,
        next_index: cursor.max(updates.len()),
    };
    for update in &updates[start..] {
        match *update {
            InputUpdate::SetHead(orientation) => {
                replay.orientation = Some(orientation);
                replay.set_head_updates += 1;
            }
            InputUpdate::SetBody(orientation) => {
                replay.orientation = Some(orientation);
                replay.set_body_updates += 1;
            }
            InputUpdate::AbsoluteMovement(_)
            | InputUpdate::RelativeMovement(_)
            | InputUpdate::WishMovement(_) => {}
        }
    }
    replay
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Transform = Transform {
        position: DVec3::new(1.0, 2.0, 3.0),
    };

    #[test]
    fn test_empty_queue_reports_no_change() {
        assert!(read_input_snapshot(BASE, Orientation::ZERO, &[], 0).is_none());
    }

    #[test]
    fn test_cursor_covering_queue_reports_no_change() {
        let updates = [InputUpdate::RelativeMovement(DVec3::X)];
        assert!(read_input_snapshot(BASE, Orientation::ZERO, &updates, 1).is_none());
        assert!(read_input_snapshot(BASE, Orientation::ZERO, &updates, 5).is_none());
    }

    #[test]
    fn test_absolute_then_relative_movement() {
        let updates = [
            InputUpdate::AbsoluteMovement(DVec3::new(10.0, 0.0, 0.0)),
            InputUpdate::RelativeMovement(DVec3::new(1.0, 1.0, 1.0)),
        ];
        let snapshot = read_input_snapshot(BASE, Orientation::ZERO, &updates, 0).unwrap();
        assert_eq!(snapshot.transform, Transform::new(11.0, 1.0, 1.0));
        assert!(snapshot.has_movement);
        assert!(!snapshot.has_wish_movement());
        assert_eq!(snapshot.next_index, 2);
    }

    #[test]
    fn test_relative_movement_builds_on_base() {
        let updates = [InputUpdate::RelativeMovement(DVec3::new(0.0, -2.0, 0.0))];
        let snapshot = read_input_snapshot(BASE, Orientation::ZERO, &updates, 0).unwrap();
        assert_eq!(snapshot.transform, Transform::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn test_only_unread_tail_is_replayed() {
        let updates = [
            InputUpdate::RelativeMovement(DVec3::new(100.0, 0.0, 0.0)),
            InputUpdate::RelativeMovement(DVec3::new(0.0, 0.0, 1.0)),
        ];
        let snapshot = read_input_snapshot(BASE, Orientation::ZERO, &updates, 1).unwrap();
        assert_eq!(snapshot.transform, Transform::new(1.0, 2.0, 4.0));
        assert_eq!(snapshot.next_index, 2);
    }

    #[test]
    fn test_wish_is_recorded_not_integrated() {
        let updates = [
            InputUpdate::WishMovement(DVec3::new(1.0, 0.0, 0.0)),
            InputUpdate::WishMovement(DVec3::new(0.0, 0.0, 1.0)),
        ];
        let snapshot = read_input_snapshot(BASE, Orientation::ZERO, &updates, 0).unwrap();
        assert_eq!(snapshot.transform, BASE);
        assert_eq!(snapshot.wish, Some(DVec3::new(0.0, 0.0, 1.0)));
        assert!(!snapshot.has_movement);
    }

    #[test]
    fn test_head_and_body_replace_orientation() {
        let head = Orientation::new(0.5, 0.1, 0.0);
        let body = Orientation::new(1.5, 0.0, 0.0);
        let updates = [InputUpdate::SetHead(head), InputUpdate::SetBody(body)];
        let snapshot = read_input_snapshot(BASE, Orientation::ZERO, &updates, 0).unwrap();
        assert_eq!(snapshot.orientation, body);
        assert_eq!(snapshot.set_head_updates, 1);
        assert_eq!(snapshot.set_body_updates, 1);
    }

    #[test]
    fn test_replay_orientation_ignores_movement() {
        let head = Orientation::new(0.25, -0.1, 0.0);
        let updates = [
            InputUpdate::RelativeMovement(DVec3::X),
            InputUpdate::SetHead(head),
            InputUpdate::WishMovement(DVec3::Z),
        ];
        let replay = replay_orientation(&updates, 0);
        assert_eq!(replay.orientation, Some(head));
        assert_eq!(replay.set_head_updates, 1);
        assert_eq!(replay.set_body_updates, 0);
        assert_eq!(replay.next_index, 3);
    }

    #[test]
    fn test_replay_orientation_cursor_never_decreases() {
        let updates = [InputUpdate::SetBody(Orientation::ZERO)];
        let replay = replay_orientation(&updates, 4);
        assert!(replay.orientation.is_none());
        assert_eq!(replay.next_index, 4);
    }
}
