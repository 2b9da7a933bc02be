//! Headless harness that runs the freecam service against an ECS world.

pub mod ecs_host;
pub mod game_loop;
pub mod session;

pub use ecs_host::{
    AvatarBlockDamage, AvatarGameMode, AvatarOrientation, AvatarTransform, ClientInbox,
    ClientMessage, EcsHost, InputQueue, MountPosition, Mounted, MountedBy, PlayerTag,
};
pub use game_loop::{GameLoop, MAX_FRAME_TIME};
pub use session::{
    Action, PlayerSummary, ScriptedAction, Session, SessionSummary, demo_script, spawn_players,
};
