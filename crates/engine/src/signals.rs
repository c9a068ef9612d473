use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use swingsig_core::{ParamError, Signal, SignalIndicator, SignalStrength, SignalType};
use tracing::debug;

use crate::builder::{AugmentedPoint, AugmentedSeries};

/// Levels the signal rules compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub rsi_oversold: Decimal,
    pub rsi_overbought: Decimal,
    /// Volume above `volume_sma * volume_spike` raises an alert.
    pub volume_spike: Decimal,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: dec!(30),
            rsi_overbought: dec!(70),
            volume_spike: dec!(1.5),
        }
    }
}

impl SignalThresholds {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.rsi_oversold < Decimal::ZERO || self.rsi_overbought > Decimal::ONE_HUNDRED {
            return Err(ParamError::invalid(
                "thresholds",
                "RSI levels must lie within 0..=100",
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(ParamError::invalid(
                "rsi_oversold",
                format!(
                    "oversold level ({}) must be below overbought level ({})",
                    self.rsi_oversold, self.rsi_overbought
                ),
            ));
        }
        if self.volume_spike <= Decimal::ZERO {
            return Err(ParamError::invalid(
                "volume_spike",
                "multiplier must be positive",
            ));
        }
        Ok(())
    }
}

/// Derives discrete signals from the two most recent indicator points.
///
/// Rule groups are evaluated in a fixed order (RSI, MACD, Bollinger, volume)
/// and every group that fires contributes one signal. A group whose inputs
/// are still warming up is skipped.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    thresholds: SignalThresholds,
}

impl SignalGenerator {
    pub fn new(thresholds: SignalThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &SignalThresholds {
        &self.thresholds
    }

    pub fn generate(&self, latest: &AugmentedPoint, previous: &AugmentedPoint) -> Vec<Signal> {
        if latest == previous {
            return Vec::new();
        }

        let mut signals = Vec::new();
        let t = &self.thresholds;
        let now = &latest.indicators;
        let before = &previous.indicators;
        let close = latest.bar.close;

        if let Some(rsi) = now.rsi {
            if rsi < t.rsi_oversold {
                signals.push(Signal::new(
                    SignalType::Buy,
                    SignalStrength::Strong,
                    SignalIndicator::Rsi,
                    "Oversold condition",
                ));
            } else if rsi > t.rsi_overbought {
                signals.push(Signal::new(
                    SignalType::Sell,
                    SignalStrength::Strong,
                    SignalIndicator::Rsi,
                    "Overbought condition",
                ));
            }
        }

        if let (Some(macd), Some(signal), Some(prev_macd), Some(prev_signal)) =
            (now.macd, now.macd_signal, before.macd, before.macd_signal)
        {
            if macd > signal && prev_macd <= prev_signal {
                signals.push(Signal::new(
                    SignalType::Buy,
                    SignalStrength::Medium,
                    SignalIndicator::Macd,
                    "Bullish crossover",
                ));
            } else if macd < signal && prev_macd >= prev_signal {
                signals.push(Signal::new(
                    SignalType::Sell,
                    SignalStrength::Medium,
                    SignalIndicator::Macd,
                    "Bearish crossover",
                ));
            }
        }

        if now.bb_lower.is_some_and(|lower| close < lower) {
            signals.push(Signal::new(
                SignalType::Buy,
                SignalStrength::Medium,
                SignalIndicator::Bollinger,
                "Price below lower band",
            ));
        } else if now.bb_upper.is_some_and(|upper| close > upper) {
            signals.push(Signal::new(
                SignalType::Sell,
                SignalStrength::Medium,
                SignalIndicator::Bollinger,
                "Price above upper band",
            ));
        }

        if let Some(avg) = now.volume_sma {
            if latest.bar.volume > avg * t.volume_spike {
                signals.push(Signal::new(
                    SignalType::Alert,
                    SignalStrength::Medium,
                    SignalIndicator::Volume,
                    "High volume spike",
                ));
            }
        }

        debug!(count = signals.len(), timestamp = %latest.bar.timestamp, "Evaluated signal rules");
        signals
    }

    /// Evaluate the last two points of a series; empty if there are fewer.
    pub fn generate_latest(&self, series: &AugmentedSeries) -> Vec<Signal> {
        series
            .latest_pair()
            .map(|(latest, previous)| self.generate(latest, previous))
            .unwrap_or_default()
    }
}

/// [`SignalGenerator::generate`] with the default thresholds.
pub fn generate_signals(latest: &AugmentedPoint, previous: &AugmentedPoint) -> Vec<Signal> {
    SignalGenerator::default().generate(latest, previous)
}
