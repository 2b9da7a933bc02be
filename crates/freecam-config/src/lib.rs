//! Configuration system for the freecam service.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, FreecamConfig, SimulationConfig, default_config_dir};
pub use error::ConfigError;
