use crate::Indicator;
use rust_decimal::Decimal;

/// Relative Strength Index (RSI), Wilder's formulation.
///
/// The first average gain/loss is the plain mean of the first `period` price
/// changes; afterwards both are smoothed with factor `1 / period`. The first
/// output therefore arrives on input `period + 1`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_value: Option<Decimal>,
    changes: usize,
    seed_gain: Decimal,
    seed_loss: Decimal,
    avg_gain: Option<Decimal>,
    avg_loss: Option<Decimal>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            period,
            prev_value: None,
            changes: 0,
            seed_gain: Decimal::ZERO,
            seed_loss: Decimal::ZERO,
            avg_gain: None,
            avg_loss: None,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        let (gain, loss) = (self.avg_gain?, self.avg_loss?);
        if loss.is_zero() {
            return Some(Decimal::ONE_HUNDRED);
        }
        let rs = gain / loss;
        Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
    }

    fn absorb(&mut self, change: Decimal) {
        let gain = change.max(Decimal::ZERO);
        let loss = (-change).max(Decimal::ZERO);
        let n = Decimal::from(self.period);

        match (self.avg_gain, self.avg_loss) {
            (Some(ag), Some(al)) => {
                self.avg_gain = Some((ag * (n - Decimal::ONE) + gain) / n);
                self.avg_loss = Some((al * (n - Decimal::ONE) + loss) / n);
            }
            _ => {
                self.changes += 1;
                self.seed_gain += gain;
                self.seed_loss += loss;
                if self.changes == self.period {
                    self.avg_gain = Some(self.seed_gain / n);
                    self.avg_loss = Some(self.seed_loss / n);
                }
            }
        }
    }
}

impl Indicator for Rsi {
    fn next(&mut self, value: Decimal) -> Option<Decimal> {
        if let Some(prev) = self.prev_value {
            self.absorb(value - prev);
        }
        self.prev_value = Some(value);
        self.value()
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.changes = 0;
        self.seed_gain = Decimal::ZERO;
        self.seed_loss = Decimal::ZERO;
        self.avg_gain = None;
        self.avg_loss = None;
    }

    fn period(&self) -> usize {
        self.period.saturating_add(1)
    }

    fn is_ready(&self) -> bool {
        self.avg_gain.is_some()
    }
}
