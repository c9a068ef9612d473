use serde::{Deserialize, Serialize};

/// Rejected parameter bundle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ParamError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ParamError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Indicator windows, in bars.
///
/// Every window is positive and `macd_fast < macd_slow`; both are checked when
/// the bundle is built or deserialized, so downstream indicator code never
/// sees an invalid window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIndicatorParams")]
pub struct IndicatorParams {
    rsi: usize,
    macd_fast: usize,
    macd_slow: usize,
    macd_signal: usize,
    bb_period: usize,
    volume_sma: usize,
    atr: usize,
    ema_trend: usize,
    sma_short: usize,
    sma_long: usize,
}

impl IndicatorParams {
    pub const DEFAULT_ATR: usize = 14;
    pub const DEFAULT_EMA_TREND: usize = 9;
    pub const DEFAULT_SMA_SHORT: usize = 20;
    pub const DEFAULT_SMA_LONG: usize = 50;

    /// Build a bundle with the default ATR and trend-line windows.
    pub fn new(
        rsi: usize,
        macd_fast: usize,
        macd_slow: usize,
        macd_signal: usize,
        bb_period: usize,
        volume_sma: usize,
    ) -> Result<Self, ParamError> {
        RawIndicatorParams {
            rsi,
            macd_fast,
            macd_slow,
            macd_signal,
            bb_period,
            volume_sma,
            ..RawIndicatorParams::default()
        }
        .try_into()
    }

    /// Replace the ATR window.
    pub fn with_atr(self, atr: usize) -> Result<Self, ParamError> {
        RawIndicatorParams {
            atr,
            ..RawIndicatorParams::from(self)
        }
        .try_into()
    }

    /// Replace the EMA and SMA trend-line windows.
    pub fn with_trend_lines(
        self,
        ema_trend: usize,
        sma_short: usize,
        sma_long: usize,
    ) -> Result<Self, ParamError> {
        RawIndicatorParams {
            ema_trend,
            sma_short,
            sma_long,
            ..RawIndicatorParams::from(self)
        }
        .try_into()
    }

    pub fn rsi(&self) -> usize {
        self.rsi
    }

    pub fn macd_fast(&self) -> usize {
        self.macd_fast
    }

    pub fn macd_slow(&self) -> usize {
        self.macd_slow
    }

    pub fn macd_signal(&self) -> usize {
        self.macd_signal
    }

    pub fn bb_period(&self) -> usize {
        self.bb_period
    }

    pub fn volume_sma(&self) -> usize {
        self.volume_sma
    }

    pub fn atr(&self) -> usize {
        self.atr
    }

    pub fn ema_trend(&self) -> usize {
        self.ema_trend
    }

    pub fn sma_short(&self) -> usize {
        self.sma_short
    }

    pub fn sma_long(&self) -> usize {
        self.sma_long
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        let raw = RawIndicatorParams::default();
        Self {
            rsi: raw.rsi,
            macd_fast: raw.macd_fast,
            macd_slow: raw.macd_slow,
            macd_signal: raw.macd_signal,
            bb_period: raw.bb_period,
            volume_sma: raw.volume_sma,
            atr: raw.atr,
            ema_trend: raw.ema_trend,
            sma_short: raw.sma_short,
            sma_long: raw.sma_long,
        }
    }
}

/// Unchecked mirror of [`IndicatorParams`], used for deserialization.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct RawIndicatorParams {
    rsi: usize,
    macd_fast: usize,
    macd_slow: usize,
    macd_signal: usize,
    bb_period: usize,
    volume_sma: usize,
    atr: usize,
    ema_trend: usize,
    sma_short: usize,
    sma_long: usize,
}

impl Default for RawIndicatorParams {
    fn default() -> Self {
        Self {
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            volume_sma: 20,
            atr: IndicatorParams::DEFAULT_ATR,
            ema_trend: IndicatorParams::DEFAULT_EMA_TREND,
            sma_short: IndicatorParams::DEFAULT_SMA_SHORT,
            sma_long: IndicatorParams::DEFAULT_SMA_LONG,
        }
    }
}

impl From<IndicatorParams> for RawIndicatorParams {
    fn from(p: IndicatorParams) -> Self {
        Self {
            rsi: p.rsi,
            macd_fast: p.macd_fast,
            macd_slow: p.macd_slow,
            macd_signal: p.macd_signal,
            bb_period: p.bb_period,
            volume_sma: p.volume_sma,
            atr: p.atr,
            ema_trend: p.ema_trend,
            sma_short: p.sma_short,
            sma_long: p.sma_long,
        }
    }
}

impl TryFrom<RawIndicatorParams> for IndicatorParams {
    type Error = ParamError;

    fn try_from(raw: RawIndicatorParams) -> Result<Self, Self::Error> {
        let windows = [
            ("rsi", raw.rsi),
            ("macd_fast", raw.macd_fast),
            ("macd_slow", raw.macd_slow),
            ("macd_signal", raw.macd_signal),
            ("bb_period", raw.bb_period),
            ("volume_sma", raw.volume_sma),
            ("atr", raw.atr),
            ("ema_trend", raw.ema_trend),
            ("sma_short", raw.sma_short),
            ("sma_long", raw.sma_long),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ParamError::invalid(name, "window must be a positive integer"));
        }
        if raw.macd_fast >= raw.macd_slow {
            return Err(ParamError::invalid(
                "macd_fast",
                format!(
                    "fast window ({}) must be shorter than slow window ({})",
                    raw.macd_fast, raw.macd_slow
                ),
            ));
        }

        Ok(Self {
            rsi: raw.rsi,
            macd_fast: raw.macd_fast,
            macd_slow: raw.macd_slow,
            macd_signal: raw.macd_signal,
            bb_period: raw.bb_period,
            volume_sma: raw.volume_sma,
            atr: raw.atr,
            ema_trend: raw.ema_trend,
            sma_short: raw.sma_short,
            sma_long: raw.sma_long,
        })
    }
}
