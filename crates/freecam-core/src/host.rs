//! The host world as seen by the camera service.
//!
//! The host owns avatars, their input queues and the client connection. The
//! service only reads snapshots from it and asks it to apply side effects.

use serde::{Deserialize, Serialize};

use crate::input::InputUpdate;
use crate::payload::CameraUpdate;
use crate::store::PlayerId;
use crate::transform::{Orientation, Transform};

/// Avatar game mode, as far as the camera service cares about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Cannot build or break; the mode forced while in freecam.
    Adventure,
    Creative,
}

/// Host-side collaborator for one world.
///
/// Getters return `None` when the avatar data is unreadable; the service
/// treats that as a soft failure and substitutes zeroed or absent values.
pub trait PlayerHost {
    fn transform(&self, id: PlayerId) -> Option<Transform>;

    fn orientation(&self, id: PlayerId) -> Option<Orientation>;

    /// Teleports the avatar and sets its head orientation.
    fn update_position(&mut self, id: PlayerId, transform: Transform, orientation: Orientation);

    /// Ordered input queue of `id`, empty when unavailable.
    fn input_queue(&self, id: PlayerId) -> &[InputUpdate];

    fn game_mode(&self, id: PlayerId) -> Option<GameMode>;

    fn set_game_mode(&mut self, id: PlayerId, mode: GameMode);

    /// Whether the avatar may damage blocks.
    fn block_damage(&self, id: PlayerId) -> Option<bool>;

    fn set_block_damage(&mut self, id: PlayerId, allowed: bool);

    /// Best-effort detach from any mount, in both directions.
    fn dismount(&mut self, id: PlayerId);

    fn send_camera(&mut self, id: PlayerId, update: CameraUpdate);

    fn send_fly_mode(&mut self, id: PlayerId, enabled: bool);

    /// Avatar transform, or the origin when unreadable.
    fn transform_or_zero(&self, id: PlayerId) -> Transform {
        self.transform(id).unwrap_or(Transform::ZERO)
    }

    /// Avatar orientation, or all-zero angles when unreadable.
    fn orientation_or_zero(&self, id: PlayerId) -> Orientation {
        self.orientation(id).unwrap_or(Orientation::ZERO)
    }
}
