//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "freecam";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Camera tuning shared by every player.
    pub freecam: FreecamConfig,
    /// Simulation harness settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Freecam and tripod tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FreecamConfig {
    /// Speed assigned to players who never picked one (clamped to 1..=10).
    pub default_speed: i32,
    /// Vertical offset added to the camera position to place the eye.
    pub eye_height: f32,
    /// Distance the avatar may drift from the tripod point before it is
    /// snapped back.
    pub tripod_stick_distance: f64,
    /// Minimum time between two tripod diagnostic lines for one player.
    pub tripod_diagnostic_interval_ms: u64,
    /// Look-lock state for players who never toggled it.
    pub look_locked_by_default: bool,
}

/// Settings for the `freecam-sim` harness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate in Hz.
    pub tick_rate_hz: u32,
    /// Number of simulated players.
    pub players: u32,
    /// Number of fixed steps to run before exiting.
    pub ticks: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for FreecamConfig {
    fn default() -> Self {
        Self {
            default_speed: 5,
            eye_height: 1.62,
            tripod_stick_distance: 0.01,
            tripod_diagnostic_interval_ms: 1000,
            look_locked_by_default: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            players: 2,
            ticks: 600,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform configuration directory for the service (`<config>/freecam`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join(APP_NAME))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("default_speed: 5"));
        assert!(ron_str.contains("tick_rate_hz: 60"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(debug: (log_level: \"debug\"))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.freecam, FreecamConfig::default());
        assert_eq!(config.debug.log_level, "debug");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let ron_str = "(freecam: (default_speed: 8))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.freecam.default_speed, 8);
        assert!((config.freecam.eye_height - 1.62).abs() < 1e-6);
        assert_eq!(config.freecam.tripod_diagnostic_interval_ms, 1000);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.freecam.default_speed = 3;
        config.simulation.players = 7;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
