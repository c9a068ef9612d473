use crate::ema::Ema;
use crate::Indicator;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// MACD (Moving Average Convergence Divergence).
///
/// Composed of three EMAs:
/// - Fast EMA of the input (default 12)
/// - Slow EMA of the input (default 26)
/// - Signal EMA of the MACD line (default 9)
///
/// The MACD line exists from input `slow`; the signal line and histogram from
/// input `slow + signal - 1`. `next()` yields the MACD line only once the
/// full output is available.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_ema: Ema,
    slow_ema: Ema,
    signal_ema: Ema,
    line: Option<Decimal>,
}

/// MACD output with all three components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdOutput {
    pub macd: Decimal,
    pub signal: Decimal,
    pub histogram: Decimal,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(fast_period < slow_period, "Fast period must be less than slow period");
        Self {
            fast_ema: Ema::new(fast_period),
            slow_ema: Ema::new(slow_period),
            signal_ema: Ema::new(signal_period),
            line: None,
        }
    }

    /// The MACD line alone; available before the signal line has warmed up.
    pub fn line(&self) -> Option<Decimal> {
        self.line
    }

    /// Returns the full MACD output (macd, signal, histogram) if ready.
    pub fn output(&self) -> Option<MacdOutput> {
        let macd = self.line?;
        let signal = self.signal_ema.value()?;
        Some(MacdOutput {
            macd,
            signal,
            histogram: macd - signal,
        })
    }

    /// Process next value and return full output if ready.
    pub fn next_output(&mut self, value: Decimal) -> Option<MacdOutput> {
        let fast = self.fast_ema.next(value);
        let slow = self.slow_ema.next(value);

        if let (Some(f), Some(s)) = (fast, slow) {
            let line = f - s;
            self.line = Some(line);
            self.signal_ema.next(line);
        }

        self.output()
    }
}

impl Indicator for Macd {
    fn next(&mut self, value: Decimal) -> Option<Decimal> {
        self.next_output(value).map(|o| o.macd)
    }

    fn reset(&mut self) {
        self.fast_ema.reset();
        self.slow_ema.reset();
        self.signal_ema.reset();
        self.line = None;
    }

    fn period(&self) -> usize {
        self.slow_ema.period().saturating_add(self.signal_ema.period()) - 1
    }

    fn is_ready(&self) -> bool {
        self.signal_ema.is_ready()
    }
}
