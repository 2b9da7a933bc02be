//! Error types for camera transitions and the command grammar.

use crate::store::PlayerId;

/// Rejected camera transitions. No state changes when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FreecamError {
    /// Tripod was requested while the player was not in freecam.
    #[error("tripod can only be enabled from freecam ({0})")]
    TripodRequiresFreecam(PlayerId),
}

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// A speed value that is not an integer in 1..=10.
    #[error("Speed must be a number between 1 and 10.")]
    InvalidSpeed(String),

    /// A token the grammar does not recognise.
    #[error("Unknown argument '{0}'. Expected a speed (1-10), tripod, lock or unlock.")]
    UnknownArgument(String),

    /// A command name no handler is registered for.
    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),

    /// An empty command line.
    #[error("Empty command.")]
    Empty,
}
