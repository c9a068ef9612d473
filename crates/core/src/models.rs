use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::traits::DataError;

// ---------------------------------------------------------------------------
// Market Data
// ---------------------------------------------------------------------------

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// An ordered, validated run of bars for one instrument.
///
/// Timestamps are strictly increasing; gaps are allowed. Indicators work on
/// sequence position, never on wall-clock spacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    instrument: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Validate and wrap a bar list.
    pub fn new(instrument: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        let instrument = instrument.into();
        if bars.is_empty() {
            return Err(DataError::InvalidSeries(format!(
                "{}: series contains no bars",
                instrument
            )));
        }

        for (i, bar) in bars.iter().enumerate() {
            if bar.open <= Decimal::ZERO
                || bar.high <= Decimal::ZERO
                || bar.low <= Decimal::ZERO
                || bar.close <= Decimal::ZERO
            {
                return Err(DataError::InvalidSeries(format!(
                    "{}: non-positive price in bar {} at {}",
                    instrument, i, bar.timestamp
                )));
            }
            if bar.volume < Decimal::ZERO {
                return Err(DataError::InvalidSeries(format!(
                    "{}: negative volume in bar {} at {}",
                    instrument, i, bar.timestamp
                )));
            }
        }

        if let Some(pair) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            let reason = if pair[1].timestamp == pair[0].timestamp {
                "duplicate timestamp"
            } else {
                "timestamps out of order"
            };
            return Err(DataError::InvalidSeries(format!(
                "{}: {} at {}",
                instrument, reason, pair[1].timestamp
            )));
        }

        Ok(Self { instrument, bars })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

/// Bar interval a data provider can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1min")]
    Min1,
    #[serde(rename = "5min")]
    Min5,
    #[serde(rename = "15min")]
    Min15,
    #[serde(rename = "30min")]
    Min30,
    #[serde(rename = "60min")]
    Min60,
    #[serde(rename = "daily")]
    Daily,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::Min1,
        Interval::Min5,
        Interval::Min15,
        Interval::Min30,
        Interval::Min60,
        Interval::Daily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Min1 => "1min",
            Interval::Min5 => "5min",
            Interval::Min15 => "15min",
            Interval::Min30 => "30min",
            Interval::Min60 => "60min",
            Interval::Daily => "daily",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown interval '{}' (expected one of: 1min, 5min, 15min, 30min, 60min, daily)",
                    s
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// A discrete signal derived from the two most recent indicator points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalType,
    pub strength: SignalStrength,
    pub indicator: SignalIndicator,
    pub reason: String,
}

impl Signal {
    pub fn new(
        kind: SignalType,
        strength: SignalStrength,
        indicator: SignalIndicator,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            strength,
            indicator,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.strength, self.kind, self.indicator, self.reason
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Buy,
    Sell,
    Alert,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
            SignalType::Alert => "ALERT",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    Strong,
    Medium,
    Weak,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalStrength::Strong => "STRONG",
            SignalStrength::Medium => "MEDIUM",
            SignalStrength::Weak => "WEAK",
        })
    }
}

/// The indicator a signal originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalIndicator {
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "BB")]
    Bollinger,
    #[serde(rename = "Volume")]
    Volume,
}

impl SignalIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalIndicator::Rsi => "RSI",
            SignalIndicator::Macd => "MACD",
            SignalIndicator::Bollinger => "BB",
            SignalIndicator::Volume => "Volume",
        }
    }
}

impl fmt::Display for SignalIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Coarse direction of the latest close relative to several moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "Strong Uptrend")]
    StrongUptrend,
    #[serde(rename = "Weak Uptrend")]
    WeakUptrend,
    #[serde(rename = "Strong Downtrend")]
    StrongDowntrend,
    #[serde(rename = "Weak Downtrend")]
    WeakDowntrend,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::StrongUptrend => "Strong Uptrend",
            Trend::WeakUptrend => "Weak Uptrend",
            Trend::StrongDowntrend => "Strong Downtrend",
            Trend::WeakDowntrend => "Weak Downtrend",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
