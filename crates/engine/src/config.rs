//! Engine configuration.
//!
//! Every section has defaults matching the conventional indicator windows and
//! risk settings, so an empty file (or no file) is a valid configuration:
//!
//! ```toml
//! trend_periods = [20, 50]
//!
//! [periods]
//! rsi = 14
//! macd_fast = 12
//! macd_slow = 26
//! macd_signal = 9
//! bb_period = 20
//! volume_sma = 20
//!
//! [risk]
//! stop_loss = 2.0
//! take_profit = 6.0
//!
//! [thresholds]
//! rsi_oversold = 30
//! rsi_overbought = 70
//! volume_spike = 1.5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use swingsig_core::{IndicatorParams, ParamError};
use swingsig_risk::RiskParams;

use crate::signals::SignalThresholds;
use crate::trend::TrendClassifier;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Invalid(#[from] ParamError),
}

/// Everything the engine needs, passed explicitly to [`crate::Engine::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Moving-average lengths for the trend classifier.
    pub trend_periods: Vec<usize>,
    pub periods: IndicatorParams,
    pub risk: RiskParams,
    pub thresholds: SignalThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_periods: TrendClassifier::default().periods().to_vec(),
            periods: IndicatorParams::default(),
            risk: RiskParams::default(),
            thresholds: SignalThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks the parts not already validated by their own constructors.
    pub fn validate(&self) -> Result<(), ParamError> {
        TrendClassifier::new(self.trend_periods.clone())?;
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_toml_str(
            r#"
            trend_periods = [10, 30, 100]

            [periods]
            rsi = 9

            [risk]
            stop_loss = 1.5
            take_profit = 4.5

            [thresholds]
            volume_spike = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.trend_periods, vec![10, 30, 100]);
        assert_eq!(config.periods.rsi(), 9);
        assert_eq!(config.periods.macd_slow(), 26);
        assert_eq!(config.risk.stop_loss(), dec!(1.5));
        assert_eq!(config.risk.take_profit(), dec!(4.5));
        assert_eq!(config.risk.risk_per_trade(), dec!(1));
        assert_eq!(config.thresholds.volume_spike, dec!(2));
        assert_eq!(config.thresholds.rsi_oversold, dec!(30));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("[periods]\nmacd_fast = 30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("macd_fast"));

        let err = EngineConfig::from_toml_str("trend_periods = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("[thresholds]\nrsi_oversold = 90\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[periods]"));
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
