use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ladder::DEFAULT_EXPONENT;

/// Tunables of the roll pipeline. Every field has a default, so `{}` is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollConfig {
    /// Sharpness of the rarity distribution around the average.
    #[serde(default = "RollConfig::default_exponent")]
    pub exponent: f64,
    /// Acceptance windows around the target rarity, narrowest first. When
    /// all of them come up empty the whole pool is used.
    #[serde(default = "RollConfig::default_tolerances")]
    pub tolerances: Vec<f64>,
    #[serde(default = "RollConfig::default_history_cap")]
    pub history_cap: usize,
}

impl RollConfig {
    const fn default_exponent() -> f64 {
        DEFAULT_EXPONENT
    }

    fn default_tolerances() -> Vec<f64> {
        vec![0.5, 1.0]
    }

    const fn default_history_cap() -> usize {
        100
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.exponent.is_finite() || self.exponent <= 0.0 {
            return Err(ConfigError::Exponent(self.exponent));
        }
        if self.tolerances.is_empty() {
            return Err(ConfigError::NoTolerances);
        }
        let mut previous = 0.0;
        for (index, &value) in self.tolerances.iter().enumerate() {
            if !value.is_finite() || value <= previous {
                return Err(ConfigError::Tolerance { index, value });
            }
            previous = value;
        }
        if self.history_cap == 0 {
            return Err(ConfigError::HistoryCap);
        }
        Ok(())
    }
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            exponent: Self::default_exponent(),
            tolerances: Self::default_tolerances(),
            history_cap: Self::default_history_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = RollConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RollConfig::default());
        assert_eq!(config.tolerances, [0.5, 1.0]);
        assert_eq!(config.history_cap, 100);
    }

    #[test]
    fn partial_override() {
        let config = RollConfig::from_json_str(r#"{"exponent": 3.5, "history_cap": 10}"#).unwrap();
        assert_eq!(config.exponent, 3.5);
        assert_eq!(config.history_cap, 10);
        assert_eq!(config.tolerances, RollConfig::default().tolerances);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            RollConfig::from_json_str(r#"{"exponent": 0}"#),
            Err(ConfigError::Exponent(_))
        ));
        assert!(matches!(
            RollConfig::from_json_str(r#"{"tolerances": []}"#),
            Err(ConfigError::NoTolerances)
        ));
        assert!(matches!(
            RollConfig::from_json_str(r#"{"tolerances": [1.0, 0.5]}"#),
            Err(ConfigError::Tolerance { index: 1, .. })
        ));
        assert!(matches!(
            RollConfig::from_json_str(r#"{"history_cap": 0}"#),
            Err(ConfigError::HistoryCap)
        ));
        assert!(matches!(
            RollConfig::from_json_str("[1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }
}
