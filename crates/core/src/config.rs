use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the camera frames a set of points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPreset {
    /// Screen padding around the bounds, in pixels
    pub padding: u32,
    pub max_zoom: f64,
    pub duration_ms: u64,
}

impl CameraPreset {
    /// Framing a single building and its waste site
    pub const BUILDING: CameraPreset = CameraPreset {
        padding: 100,
        max_zoom: 19.0,
        duration_ms: 1000,
    };

    /// Framing every building and site involved in a date range
    pub const RANGE: CameraPreset = CameraPreset {
        padding: 120,
        max_zoom: 18.0,
        duration_ms: 1200,
    };

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("steps must be at least 1")]
    ZeroSteps,

    #[error("replay config must be a JSON object")]
    NotAnObject,

    #[error("invalid replay config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Timing of trip replays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Interpolation steps per trip
    pub steps: u32,
    pub trip_duration_ms: u64,
    /// Delay between consecutive launches in a batch
    pub stagger_ms: u64,
    pub building_camera: CameraPreset,
    pub range_camera: CameraPreset,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            steps: 120,
            trip_duration_ms: 3500,
            stagger_ms: 500,
            building_camera: CameraPreset::BUILDING,
            range_camera: CameraPreset::RANGE,
        }
    }
}

impl ReplayConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        // serde also accepts a positional array for structs
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        let config: ReplayConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(())
    }

    pub fn trip_duration(&self) -> Duration {
        Duration::from_millis(self.trip_duration_ms)
    }

    /// Launch offset of the `index`-th trip in a batch.
    pub fn launch_offset(&self, index: usize) -> Duration {
        Duration::from_millis(self.stagger_ms.saturating_mul(index as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReplayConfig::default();
        assert_eq!(config.steps, 120);
        assert_eq!(config.trip_duration(), Duration::from_millis(3500));
        assert_eq!(config.launch_offset(0), Duration::ZERO);
        assert_eq!(config.launch_offset(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ReplayConfig::from_json(r#"{"stagger_ms": 250}"#).unwrap();
        assert_eq!(config.stagger_ms, 250);
        assert_eq!(config.steps, 120);
        assert_eq!(config.range_camera, CameraPreset::RANGE);
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert!(matches!(
            ReplayConfig::from_json(r#"{"steps": 0}"#),
            Err(ConfigError::ZeroSteps)
        ));
    }

    #[test]
    fn test_non_object_json_rejected() {
        assert!(matches!(ReplayConfig::from_json("[]"), Err(ConfigError::NotAnObject)));
        assert!(matches!(ReplayConfig::from_json("[5]"), Err(ConfigError::NotAnObject)));
        assert!(matches!(ReplayConfig::from_json("120"), Err(ConfigError::NotAnObject)));
        assert!(matches!(ReplayConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            ReplayConfig::from_json(r#"{"steps": "many"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_launch_offset_saturates() {
        let config = ReplayConfig {
            stagger_ms: u64::MAX / 2,
            ..ReplayConfig::default()
        };
        assert_eq!(config.launch_offset(1), Duration::from_millis(u64::MAX / 2));
        assert_eq!(config.launch_offset(3), Duration::from_millis(u64::MAX));

        let config = ReplayConfig::default();
        assert_eq!(config.launch_offset(1 << 33), Duration::from_millis(500 << 33));
    }
}
