//! Per-player camera state.
//!
//! One concurrent map per mode plus two settings maps. Maps are sharded
//! ([`DashMap`]), so players are served from different threads without a
//! global lock. Calls for the same player must be serialized by the caller.

use std::fmt;
use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::one::RefMut;

use crate::host::GameMode;
use crate::transform::{Orientation, Transform};

/// Slowest selectable speed.
pub const MIN_SPEED: i32 = 1;
/// Fastest selectable speed.
pub const MAX_SPEED: i32 = 10;
/// Speed of a player who never chose one.
pub const DEFAULT_SPEED: i32 = 5;

/// Stable identity of a connected player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Camera mode of a player. Exactly one holds at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Inactive,
    Freecam,
    Tripod,
}

/// State owned by an active freecam.
#[derive(Clone, Debug, PartialEq)]
pub struct FreecamRecord {
    /// Detached camera position.
    pub transform: Transform,
    /// Detached camera orientation.
    pub orientation: Orientation,
    /// Avatar position before activation, restored on exit.
    pub avatar_transform: Transform,
    /// Avatar orientation before activation, restored on exit.
    pub avatar_orientation: Orientation,
    /// Avatar game mode before activation, restored on exit.
    pub previous_game_mode: Option<GameMode>,
    /// Avatar block-damage flag before activation, restored on exit.
    pub previous_block_damage: Option<bool>,
    /// Next unread index of the input queue.
    pub input_cursor: usize,
    /// Set once the first input sample has been logged.
    pub logged_input_sample: bool,
}

/// State owned by an active tripod.
#[derive(Clone, Debug, PartialEq)]
pub struct TripodRecord {
    /// Frozen camera position; the avatar is pinned here.
    pub transform: Transform,
    /// Frozen camera orientation.
    pub orientation: Orientation,
    /// Orientation the avatar's head/body should show.
    pub avatar_orientation: Orientation,
    /// Next unread index of the input queue.
    pub input_cursor: usize,
    /// When the last diagnostic line was written.
    pub last_diagnostic_at: Instant,
}

/// Clamps a requested speed into `MIN_SPEED..=MAX_SPEED`.
pub fn clamp_speed(speed: i32) -> i32 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Process-wide store of camera records and per-player settings.
///
/// Entries are only removed by the disable paths; settings live for the
/// life of the store.
pub struct PlayerStateStore {
    freecam: DashMap<PlayerId, FreecamRecord>,
    tripod: DashMap<PlayerId, TripodRecord>,
    speeds: DashMap<PlayerId, i32>,
    look_locked: DashMap<PlayerId, bool>,
    default_speed: i32,
    look_locked_by_default: bool,
}

impl PlayerStateStore {
    /// Creates an empty store with the given setting defaults.
    pub fn new(default_speed: i32, look_locked_by_default: bool) -> Self {
        Self {
            freecam: DashMap::new(),
            tripod: DashMap::new(),
            speeds: DashMap::new(),
            look_locked: DashMap::new(),
            default_speed: clamp_speed(default_speed),
            look_locked_by_default,
        }
    }

    /// Current mode of `id`.
    pub fn mode(&self, id: PlayerId) -> Mode {
        if self.freecam.contains_key(&id) {
            Mode::Freecam
        } else if self.tripod.contains_key(&id) {
            Mode::Tripod
        } else {
            Mode::Inactive
        }
    }

    pub fn is_active(&self, id: PlayerId) -> bool {
        self.freecam.contains_key(&id)
    }

    pub fn is_tripod_active(&self, id: PlayerId) -> bool {
        self.tripod.contains_key(&id)
    }

    pub fn is_look_locked(&self, id: PlayerId) -> bool {
        self.look_locked
            .get(&id)
            .map_or(self.look_locked_by_default, |v| *v)
    }

    pub fn speed(&self, id: PlayerId) -> i32 {
        self.speeds.get(&id).map_or(self.default_speed, |v| *v)
    }

    /// Stores `clamp_speed(speed)` and returns the stored value.
    pub fn store_speed(&self, id: PlayerId, speed: i32) -> i32 {
        let clamped = clamp_speed(speed);
        self.speeds.insert(id, clamped);
        clamped
    }

    pub fn store_look_locked(&self, id: PlayerId, locked: bool) {
        self.look_locked.insert(id, locked);
    }

    /// Players that currently hold a freecam or tripod record.
    pub fn engaged_players(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self
            .freecam
            .iter()
            .map(|entry| *entry.key())
            .chain(self.tripod.iter().map(|entry| *entry.key()))
            .collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn insert_freecam(&self, id: PlayerId, record: FreecamRecord) {
        debug_assert!(
            !self.tripod.contains_key(&id),
            "{id} entering freecam with a tripod record"
        );
        self.freecam.insert(id, record);
    }

    pub(crate) fn remove_freecam(&self, id: PlayerId) -> Option<FreecamRecord> {
        self.freecam.remove(&id).map(|(_, record)| record)
    }

    /// Copy of the freecam record of `id`.
    pub fn freecam_record(&self, id: PlayerId) -> Option<FreecamRecord> {
        self.freecam.get(&id).map(|record| record.clone())
    }

    pub(crate) fn freecam_mut(&self, id: PlayerId) -> Option<RefMut<'_, PlayerId, FreecamRecord>> {
        self.freecam.get_mut(&id)
    }

    pub(crate) fn insert_tripod(&self, id: PlayerId, record: TripodRecord) {
        debug_assert!(
            !self.freecam.contains_key(&id),
            "{id} entering tripod with a freecam record"
        );
        self.tripod.insert(id, record);
    }

    pub(crate) fn remove_tripod(&self, id: PlayerId) -> Option<TripodRecord> {
        self.tripod.remove(&id).map(|(_, record)| record)
    }

    /// Copy of the tripod record of `id`.
    pub fn tripod_record(&self, id: PlayerId) -> Option<TripodRecord> {
        self.tripod.get(&id).map(|record| record.clone())
    }

    pub(crate) fn tripod_mut(&self, id: PlayerId) -> Option<RefMut<'_, PlayerId, TripodRecord>> {
        self.tripod.get_mut(&id)
    }
}

impl Default for PlayerStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn freecam_record() -> FreecamRecord {
        FreecamRecord {
            transform: Transform::ZERO,
            orientation: Orientation::ZERO,
            avatar_transform: Transform::ZERO,
            avatar_orientation: Orientation::ZERO,
            previous_game_mode: None,
            previous_block_damage: None,
            input_cursor: 0,
            logged_input_sample: false,
        }
    }

    #[test]
    fn test_defaults_for_unknown_player() {
        let store = PlayerStateStore::default();
        let id = PlayerId(1);
        assert_eq!(store.mode(id), Mode::Inactive);
        assert_eq!(store.speed(id), DEFAULT_SPEED);
        assert!(!store.is_look_locked(id));
    }

    #[test]
    fn test_speed_is_clamped() {
        let store = PlayerStateStore::default();
        let id = PlayerId(1);
        assert_eq!(store.store_speed(id, -5), 1);
        assert_eq!(store.speed(id), 1);
        assert_eq!(store.store_speed(id, 99), 10);
        assert_eq!(store.speed(id), 10);
        assert_eq!(store.store_speed(id, 7), 7);
        assert_eq!(store.speed(id), 7);
    }

    #[test]
    fn test_configured_defaults() {
        let store = PlayerStateStore::new(42, true);
        assert_eq!(store.speed(PlayerId(3)), MAX_SPEED);
        assert!(store.is_look_locked(PlayerId(3)));
    }

    #[test]
    fn test_mode_follows_records() {
        let store = PlayerStateStore::default();
        let id = PlayerId(9);
        store.insert_freecam(id, freecam_record());
        assert_eq!(store.mode(id), Mode::Freecam);
        assert!(store.is_active(id));
        assert!(!store.is_tripod_active(id));

        assert!(store.remove_freecam(id).is_some());
        assert!(store.remove_freecam(id).is_none());
        assert_eq!(store.mode(id), Mode::Inactive);
    }

    #[test]
    fn test_engaged_players_sorted() {
        let store = PlayerStateStore::default();
        store.insert_freecam(PlayerId(5), freecam_record());
        store.insert_freecam(PlayerId(2), freecam_record());
        assert_eq!(store.engaged_players(), vec![PlayerId(2), PlayerId(5)]);
    }

    #[test]
    fn test_concurrent_players_do_not_interfere() {
        let store = Arc::new(PlayerStateStore::default());
        let handles: Vec<_> = (0..8u64)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let id = PlayerId(n);
                    for _ in 0..100 {
                        store.insert_freecam(id, freecam_record());
                        store.store_speed(id, n as i32);
                        assert!(store.remove_freecam(id).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(store.engaged_players().is_empty());
        assert_eq!(store.speed(PlayerId(0)), MIN_SPEED);
        assert_eq!(store.speed(PlayerId(7)), 7);
    }
}
