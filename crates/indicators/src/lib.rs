//! Technical indicators over `Decimal` price and volume series.
//!
//! Each indicator exists in two shapes: a streaming state machine that
//! implements [`Indicator`] and is fed one value at a time, and a pure series
//! function in [`series`] that runs a fresh state machine over a whole slice
//! and returns one `Option` per input (`None` inside the warm-up window).

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod series;
pub mod sma;

pub use series::{IndicatorError, Warmup};

use rust_decimal::Decimal;

/// Trait for streaming (incremental) indicators.
/// Feed one value at a time; the indicator maintains internal state.
pub trait Indicator: Send + Sync {
    /// Process the next value and return the indicator output (if ready).
    fn next(&mut self, value: Decimal) -> Option<Decimal>;

    /// Reset the indicator to its initial state.
    fn reset(&mut self);

    /// The number of inputs consumed before the first output is produced.
    fn period(&self) -> usize;

    /// Whether the indicator has enough data to produce output.
    fn is_ready(&self) -> bool;
}
