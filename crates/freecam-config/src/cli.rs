//! Command-line argument parsing for the freecam harness.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Freecam harness command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "freecam-sim", about = "Freecam and tripod camera simulation")]
pub struct CliArgs {
    /// Number of fixed simulation steps to run.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Number of simulated players.
    #[arg(long)]
    pub players: Option<u32>,

    /// Default freecam speed (1-10).
    #[arg(long)]
    pub speed: Option<i32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ticks) = args.ticks {
            self.simulation.ticks = ticks;
        }
        if let Some(players) = args.players {
            self.simulation.players = players;
        }
        if let Some(speed) = args.speed {
            self.freecam.default_speed = speed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
