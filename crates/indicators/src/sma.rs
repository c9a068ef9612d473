use crate::Indicator;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Upper bound on the window buffer reserved up front; larger windows grow on demand.
const MAX_PREALLOC: usize = 1024;

/// Simple Moving Average (SMA) over the trailing `period` values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<Decimal>,
    sum: Decimal,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            window: VecDeque::with_capacity(period.min(MAX_PREALLOC)),
            sum: Decimal::ZERO,
        }
    }

    /// Current average, once the window is full.
    pub fn value(&self) -> Option<Decimal> {
        self.is_ready().then(|| self.sum / Decimal::from(self.period))
    }

    /// The values currently inside the window, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &Decimal> + '_ {
        self.window.iter()
    }
}

impl Indicator for Sma {
    fn next(&mut self, value: Decimal) -> Option<Decimal> {
        self.window.push_back(value);
        self.sum += value;
        if self.window.len() > self.period {
            if let Some(evicted) = self.window.pop_front() {
                self.sum -= evicted;
            }
        }
        self.value()
    }

    fn reset(&mut self) {
        self.window.clear();
        self.sum = Decimal::ZERO;
    }

    fn period(&self) -> usize {
        self.period
    }

    fn is_ready(&self) -> bool {
        self.window.len() == self.period
    }
}
