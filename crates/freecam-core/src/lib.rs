//! Server-side free camera and tripod modes for players.
//!
//! A player in freecam leaves the avatar standing in place while a detached
//! camera flies around. Tripod parks that camera and hands control back to
//! the avatar. The engine side is reached through [`PlayerHost`].

pub mod command;
pub mod error;
pub mod guard;
pub mod host;
pub mod input;
pub mod payload;
pub mod service;
pub mod store;
pub mod tick;
pub mod transform;
pub mod tuning;

#[cfg(test)]
mod testing;

pub use command::{
    Command, FreecamArgs, ModeKeyword, execute_command, parse_command, parse_freecam_args,
};
pub use error::{CommandError, FreecamError};
pub use guard::BlockAction;
pub use host::{GameMode, PlayerHost};
pub use input::{
    InputSnapshot, InputUpdate, OrientationReplay, read_input_snapshot, replay_orientation,
};
pub use payload::{
    ApplyLook, ApplyMovement, CameraPayload, CameraUpdate, MouseInput, MouseInputTarget,
    MovementRates, build_camera_update, build_freecam_settings,
};
pub use service::{FREECAM_GAME_MODE, FreecamService};
pub use store::{
    DEFAULT_SPEED, FreecamRecord, MAX_SPEED, MIN_SPEED, Mode, PlayerId, PlayerStateStore,
    TripodRecord, clamp_speed,
};
pub use tick::integrate_wish;
pub use transform::{Orientation, Transform};
pub use tuning::FreecamTuning;
