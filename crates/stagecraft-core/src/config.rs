//! Editor configuration: gesture thresholds, snapping and editing defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Thresholds and timeouts for gesture recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Movement (screen px) below which a contact still counts as a tap.
    pub tap_max_movement: f64,
    /// Longest press that still counts as a tap.
    pub tap_max_duration_ms: u64,
    /// Maximum gap between two taps forming a double-tap.
    pub double_tap_window_ms: u64,
    /// Maximum distance (screen px) between two taps forming a double-tap.
    pub double_tap_max_distance: f64,
    /// Hold duration before a stationary contact becomes a long-press.
    pub long_press_delay_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_max_movement: 10.0,
            tap_max_duration_ms: 300,
            double_tap_window_ms: 300,
            double_tap_max_distance: 30.0,
            long_press_delay_ms: 500,
        }
    }
}

impl GestureConfig {
    pub fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    pub fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_delay_ms)
    }
}

/// Settings for the editing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub gesture: GestureConfig,
    /// Minimum viewport zoom.
    pub min_zoom: f64,
    /// Maximum viewport zoom.
    pub max_zoom: f64,
    /// Grid cell size in world units.
    pub grid_size: f64,
    /// Distance (world units) within which neighbour edges attract a drag.
    pub snap_threshold: f64,
    /// Smallest width/height a platform can be resized to.
    pub min_platform_size: f64,
    /// Side length (screen px) of the resize handle at a platform's bottom-right corner.
    pub resize_handle_size: f64,
    /// Offset applied to duplicated entities, and to pastes without a pointer.
    pub duplicate_offset: f64,
    /// Size of newly placed platforms.
    pub platform_width: f64,
    pub platform_height: f64,
    /// Number of snapshots the undo stack retains.
    pub history_capacity: usize,
    /// Delay before a held control starts repeating.
    pub hold_delay_ms: u64,
    /// Interval between repeats while a control stays held.
    pub hold_interval_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            min_zoom: 0.25,
            max_zoom: 2.0,
            grid_size: 20.0,
            snap_threshold: 10.0,
            min_platform_size: 20.0,
            resize_handle_size: 16.0,
            duplicate_offset: 20.0,
            platform_width: 100.0,
            platform_height: 20.0,
            history_capacity: 50,
            hold_delay_ms: 400,
            hold_interval_ms: 80,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn hold_delay(&self) -> Duration {
        Duration::from_millis(self.hold_delay_ms)
    }

    pub fn hold_interval(&self) -> Duration {
        Duration::from_millis(self.hold_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.gesture.tap_max_movement - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.gesture.long_press_delay(), Duration::from_millis(500));
        assert_eq!(config.history_capacity, 50);
        assert!((config.min_zoom - 0.25).abs() < f64::EPSILON);
        assert!((config.max_zoom - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"grid_size": 32.0, "gesture": {"long_press_delay_ms": 700}}"#).unwrap();
        assert!((config.grid_size - 32.0).abs() < f64::EPSILON);
        assert_eq!(config.gesture.long_press_delay_ms, 700);
        assert_eq!(config.gesture.tap_max_duration_ms, 300);
        assert!((config.snap_threshold - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json() {
        let result = EditorConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = EditorConfig::load(Path::new("/nonexistent/stagecraft.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
