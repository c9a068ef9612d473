use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::builder::AugmentedPoint;
use crate::signals::SignalThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaPosition {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacdBias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Momentum {
    Oversold,
    Overbought,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeState {
    High,
    Normal,
}

macro_rules! impl_label {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $label),+
                })
            }
        }
    };
}

impl_label!(MaPosition { Above => "ABOVE", Below => "BELOW" });
impl_label!(MacdBias { Bullish => "BULLISH", Bearish => "BEARISH" });
impl_label!(Momentum { Oversold => "OVERSOLD", Overbought => "OVERBOUGHT", Neutral => "NEUTRAL" });
impl_label!(VolumeState { High => "HIGH", Normal => "NORMAL" });

/// Snapshot of where the latest bar sits relative to its indicators.
///
/// States are `None` while the indicator they read is warming up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    /// Close-to-close change against the previous bar, in percent.
    pub price_change_pct: Decimal,
    /// Close relative to the Bollinger middle band (the `bb_period` SMA).
    pub price_vs_ma: Option<MaPosition>,
    pub macd_bias: Option<MacdBias>,
    pub momentum: Option<Momentum>,
    pub volume: Option<VolumeState>,
}

impl TechnicalSummary {
    pub fn from_points(
        latest: &AugmentedPoint,
        previous: &AugmentedPoint,
        thresholds: &SignalThresholds,
    ) -> Self {
        let ind = &latest.indicators;
        let close = latest.bar.close;

        Self {
            price_change_pct: change_percentage(close, previous.bar.close),
            price_vs_ma: ind.bb_middle.map(|mid| {
                if close > mid {
                    MaPosition::Above
                } else {
                    MaPosition::Below
                }
            }),
            macd_bias: ind.macd.zip(ind.macd_signal).map(|(macd, signal)| {
                if macd > signal {
                    MacdBias::Bullish
                } else {
                    MacdBias::Bearish
                }
            }),
            momentum: ind.rsi.map(|rsi| {
                if rsi < thresholds.rsi_oversold {
                    Momentum::Oversold
                } else if rsi > thresholds.rsi_overbought {
                    Momentum::Overbought
                } else {
                    Momentum::Neutral
                }
            }),
            volume: ind.volume_sma.map(|avg| {
                if latest.bar.volume > avg {
                    VolumeState::High
                } else {
                    VolumeState::Normal
                }
            }),
        }
    }
}

/// Percentage change from `previous` to `current`; zero when `previous` is zero.
pub fn change_percentage(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    (current - previous) / previous * Decimal::ONE_HUNDRED
}
