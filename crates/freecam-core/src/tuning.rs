//! Runtime tuning derived from [`FreecamConfig`].

use std::time::Duration;

use freecam_config::FreecamConfig;

use crate::store::clamp_speed;

/// Tuning values the service reads on every transition and tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FreecamTuning {
    /// Speed for players without a stored setting, already clamped.
    pub default_speed: i32,
    /// Added to the camera's vertical position to form the eye position.
    pub eye_height: f32,
    /// Drift allowed before the avatar is pinned back to the tripod point.
    pub tripod_stick_distance: f64,
    /// Minimum spacing of tripod diagnostic lines per player.
    pub tripod_diagnostic_interval: Duration,
    /// Look-lock for players without a stored setting.
    pub look_locked_by_default: bool,
}

impl From<&FreecamConfig> for FreecamTuning {
    fn from(config: &FreecamConfig) -> Self {
        Self {
            default_speed: clamp_speed(config.default_speed),
            eye_height: config.eye_height,
            tripod_stick_distance: config.tripod_stick_distance,
            tripod_diagnostic_interval: Duration::from_millis(
                config.tripod_diagnostic_interval_ms,
            ),
            look_locked_by_default: config.look_locked_by_default,
        }
    }
}

impl Default for FreecamTuning {
    fn default() -> Self {
        Self::from(&FreecamConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_matches_config_defaults() {
        let tuning = FreecamTuning::default();
        assert_eq!(tuning.default_speed, 5);
        assert!((tuning.eye_height - 1.62).abs() < 1e-6);
        assert!((tuning.tripod_stick_distance - 0.01).abs() < 1e-12);
        assert_eq!(tuning.tripod_diagnostic_interval, Duration::from_secs(1));
        assert!(!tuning.look_locked_by_default);
    }

    #[test]
    fn test_configured_speed_is_clamped() {
        let config = FreecamConfig {
            default_speed: 0,
            ..FreecamConfig::default()
        };
        assert_eq!(FreecamTuning::from(&config).default_speed, 1);
    }
}
