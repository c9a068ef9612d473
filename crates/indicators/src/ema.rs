use crate::Indicator;
use rust_decimal::Decimal;

/// Exponential Moving Average (EMA).
///
/// Smoothing factor is `2 / (period + 1)`. The first output is the simple
/// average of the first `period` values; every later output blends the new
/// value into the previous EMA.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: Decimal,
    current: Option<Decimal>,
    seen: usize,
    seed_sum: Decimal,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            period,
            alpha: Decimal::TWO / (Decimal::from(period) + Decimal::ONE),
            current: None,
            seen: 0,
            seed_sum: Decimal::ZERO,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        self.current
    }
}

impl Indicator for Ema {
    fn next(&mut self, value: Decimal) -> Option<Decimal> {
        self.current = match self.current {
            Some(prev) => Some(prev + (value - prev) * self.alpha),
            None => {
                self.seen += 1;
                self.seed_sum += value;
                (self.seen == self.period).then(|| self.seed_sum / Decimal::from(self.period))
            }
        };
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
        self.seen = 0;
        self.seed_sum = Decimal::ZERO;
    }

    fn period(&self) -> usize {
        self.period
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}
