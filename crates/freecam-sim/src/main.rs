//! Runs a scripted freecam session and logs the outcome.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p freecam-sim -- --players 3 --ticks 300`.

use clap::Parser;
use freecam_config::{CliArgs, Config, default_config_dir};
use freecam_core::{FreecamService, FreecamTuning};
use freecam_sim::{EcsHost, GameLoop, Session, demo_script, spawn_players};
use tracing::info;

fn main() {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => match default_config_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Failed to resolve config directory: {e}");
                std::process::exit(1);
            }
        },
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    freecam_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let tuning = FreecamTuning::from(&config.freecam);
    info!(
        players = config.simulation.players,
        ticks = config.simulation.ticks,
        tick_rate_hz = config.simulation.tick_rate_hz,
        default_speed = tuning.default_speed,
        "starting freecam session"
    );

    let mut host = EcsHost::new();
    let players = spawn_players(&mut host, config.simulation.players);
    let script = demo_script(&players);
    let mut session = Session::new(FreecamService::from_tuning(tuning), host, script);

    let mut game_loop = GameLoop::new(config.simulation.tick_rate_hz);
    let frame_time = game_loop.fixed_dt();
    while game_loop.step_count() < config.simulation.ticks {
        game_loop.advance(frame_time, |dt, step| session.step(step, dt));
    }

    session.finish().log();
}
