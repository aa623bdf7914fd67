// config.rs - Simulation settings with defaults and JSON loading

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ConfigError;
use crate::grid::DEFAULT_ALIVE_PROBABILITY;
use crate::scheduler::{Cadence, Speed};

/// Settings for one simulation. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    pub alive_probability: f64,
    pub normal_delay_ms: u64,
    pub fast_delay_ms: u64,
    pub initial_speed: Speed,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 28,
            cols: 28,
            alive_probability: DEFAULT_ALIVE_PROBABILITY,
            normal_delay_ms: 1000,
            fast_delay_ms: 100,
            initial_speed: Speed::Normal,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        info!("loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(ConfigError::Invalid(format!(
                "alive_probability must lie in [0, 1], got {}",
                self.alive_probability
            )));
        }
        if self.normal_delay_ms == 0 || self.fast_delay_ms == 0 {
            return Err(ConfigError::Invalid("delays must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn cadence(&self) -> Cadence {
        Cadence {
            normal: Duration::from_millis(self.normal_delay_ms),
            fast: Duration::from_millis(self.fast_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_parsing_an_empty_object_defaults_are_used() {
        let config = SimulationConfig::from_json("{}").unwrap();

        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.cadence().normal, Duration::from_millis(1000));
        assert_eq!(config.cadence().fast, Duration::from_millis(100));
    }

    #[test]
    fn when_parsing_partial_json_only_given_fields_change() {
        let config =
            SimulationConfig::from_json(r#"{ "rows": 10, "initial_speed": "fast" }"#).unwrap();

        assert_eq!(config.rows, 10);
        assert_eq!(config.cols, 28);
        assert_eq!(config.initial_speed, Speed::Fast);
    }

    #[test]
    fn when_values_are_invalid_parsing_fails() {
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "rows": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "alive_probability": 1.2 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "fast_delay_ms": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "rows": -1 }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn when_the_file_is_missing_loading_fails_with_io() {
        assert!(matches!(
            SimulationConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
