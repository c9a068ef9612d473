//! Whole-series indicator functions.
//!
//! Each function runs a fresh streaming indicator across its input and
//! returns one entry per input, `None` while the indicator warms up. Nothing
//! is shared between calls.

use crate::atr::Atr;
use crate::bollinger::{BollingerBands, BollingerOutput};
use crate::ema::Ema;
use crate::macd::Macd;
use crate::rsi::Rsi;
use crate::sma::Sma;
use crate::Indicator;
use rust_decimal::Decimal;

/// How to treat an input shorter than an indicator's warm-up requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Warmup {
    /// Fail with [`IndicatorError::InsufficientData`].
    #[default]
    Strict,
    /// Return the `None`-prefixed output whatever the input length.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("Insufficient data for {indicator}: need {required} points, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },
    #[error("Invalid period for {indicator}: {period}")]
    InvalidPeriod { indicator: &'static str, period: usize },
    #[error("Input length mismatch for {indicator}: {detail}")]
    LengthMismatch {
        indicator: &'static str,
        detail: String,
    },
}

/// Output of [`macd`]: three columns aligned with the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MacdColumns {
    pub macd: Vec<Option<Decimal>>,
    pub signal: Vec<Option<Decimal>>,
    pub histogram: Vec<Option<Decimal>>,
}

/// Minimum input length for a non-empty output, checked against `warmup`.
pub fn ensure_len(
    indicator: &'static str,
    required: usize,
    available: usize,
    warmup: Warmup,
) -> Result<(), IndicatorError> {
    if warmup == Warmup::Strict && available < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            available,
        });
    }
    Ok(())
}

fn ensure_period(indicator: &'static str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod { indicator, period });
    }
    Ok(())
}

/// Drive any streaming indicator across `values`.
pub fn run<I: Indicator>(
    indicator: &'static str,
    mut state: I,
    values: &[Decimal],
    warmup: Warmup,
) -> Result<Vec<Option<Decimal>>, IndicatorError> {
    ensure_len(indicator, state.period(), values.len(), warmup)?;
    Ok(values.iter().map(|v| state.next(*v)).collect())
}

pub fn sma(
    values: &[Decimal],
    period: usize,
    warmup: Warmup,
) -> Result<Vec<Option<Decimal>>, IndicatorError> {
    ensure_period("SMA", period)?;
    run("SMA", Sma::new(period), values, warmup)
}

pub fn ema(
    values: &[Decimal],
    period: usize,
    warmup: Warmup,
) -> Result<Vec<Option<Decimal>>, IndicatorError> {
    ensure_period("EMA", period)?;
    run("EMA", Ema::new(period), values, warmup)
}

pub fn rsi(
    values: &[Decimal],
    period: usize,
    warmup: Warmup,
) -> Result<Vec<Option<Decimal>>, IndicatorError> {
    ensure_period("RSI", period)?;
    run("RSI", Rsi::new(period), values, warmup)
}

/// MACD line, signal line and histogram.
///
/// The line column fills in from index `slow - 1`, the other two from
/// `slow + signal - 2`. Strict mode requires the full set.
pub fn macd(
    values: &[Decimal],
    fast: usize,
    slow: usize,
    signal: usize,
    warmup: Warmup,
) -> Result<MacdColumns, IndicatorError> {
    ensure_period("MACD", fast)?;
    ensure_period("MACD", slow)?;
    ensure_period("MACD", signal)?;
    if fast >= slow {
        return Err(IndicatorError::InvalidPeriod {
            indicator: "MACD",
            period: fast,
        });
    }

    let mut state = Macd::new(fast, slow, signal);
    ensure_len("MACD", state.period(), values.len(), warmup)?;

    let mut columns = MacdColumns {
        macd: Vec::with_capacity(values.len()),
        signal: Vec::with_capacity(values.len()),
        histogram: Vec::with_capacity(values.len()),
    };
    for v in values {
        let out = state.next_output(*v);
        columns.macd.push(state.line());
        columns.signal.push(out.map(|o| o.signal));
        columns.histogram.push(out.map(|o| o.histogram));
    }
    Ok(columns)
}

/// Bollinger Bands with `num_std` population standard deviations.
pub fn bollinger(
    values: &[Decimal],
    period: usize,
    num_std: Decimal,
    warmup: Warmup,
) -> Result<Vec<Option<BollingerOutput>>, IndicatorError> {
    ensure_period("Bollinger Bands", period)?;
    let mut state = BollingerBands::new(period, num_std);
    ensure_len("Bollinger Bands", state.period(), values.len(), warmup)?;
    Ok(values.iter().map(|v| state.next_output(*v)).collect())
}

/// Average True Range over aligned high/low/close columns.
pub fn atr(
    highs: &[Decimal],
    lows: &[Decimal],
    closes: &[Decimal],
    period: usize,
    warmup: Warmup,
) -> Result<Vec<Option<Decimal>>, IndicatorError> {
    ensure_period("ATR", period)?;
    if highs.len() != closes.len() || lows.len() != closes.len() {
        return Err(IndicatorError::LengthMismatch {
            indicator: "ATR",
            detail: format!(
                "{} highs, {} lows, {} closes",
                highs.len(),
                lows.len(),
                closes.len()
            ),
        });
    }

    let mut state = Atr::new(period);
    ensure_len("ATR", state.period(), closes.len(), warmup)?;
    Ok(highs
        .iter()
        .zip(lows)
        .zip(closes)
        .map(|((h, l), c)| state.next_hlc(*h, *l, *c))
        .collect())
}
