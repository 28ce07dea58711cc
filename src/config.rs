// src/config.rs
use crate::global_variables::{
    DEFAULT_GREEN_DURATION_MS, DEFAULT_ROAD_WIDTH, DEFAULT_YELLOW_DURATION_MS, DEFAULT_ZONE_DEPTH,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings supplied whenever a signal mode is (re)initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub green_duration_ms: u64,
    pub yellow_duration_ms: u64,
    /// Sensing zone depth behind each stop line.
    pub zone_depth: f64,
    pub road_width: f64,
    /// Zero a pair's arrival count once its all-red clearance completes.
    pub reset_arrivals_on_handoff: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            green_duration_ms: DEFAULT_GREEN_DURATION_MS,
            yellow_duration_ms: DEFAULT_YELLOW_DURATION_MS,
            zone_depth: DEFAULT_ZONE_DEPTH,
            road_width: DEFAULT_ROAD_WIDTH,
            reset_arrivals_on_handoff: false,
        }
    }
}

impl SignalConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = SignalConfig::from_json_str(r#"{ "green_duration_ms": 8000 }"#).unwrap();
        assert_eq!(config.green_duration_ms, 8000);
        assert_eq!(config.yellow_duration_ms, DEFAULT_YELLOW_DURATION_MS);
        assert_eq!(config.zone_depth, DEFAULT_ZONE_DEPTH);
        assert!(!config.reset_arrivals_on_handoff);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SignalConfig::from_json_str("{ green").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut path = std::env::temp_dir();
        path.push("intersection_signals_no_such_config.json");
        let err = SignalConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
