use crate::sma::Sma;
use crate::Indicator;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bollinger Bands: SMA middle band with bands at `num_std` population
/// standard deviations.
///
/// Returns the middle band from `next()`. Use `output()` for all three bands.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    num_std: Decimal,
    sma: Sma,
    last: Option<BollingerOutput>,
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: Decimal,
    pub middle: Decimal,
    pub lower: Decimal,
}

impl BollingerBands {
    pub fn new(period: usize, num_std_dev: Decimal) -> Self {
        Self {
            num_std: num_std_dev,
            sma: Sma::new(period),
            last: None,
        }
    }

    /// Population standard deviation of the current window around `mean`.
    fn std_dev(&self, mean: Decimal) -> Decimal {
        let n = Decimal::from(self.sma.period());
        let variance = self
            .sma
            .window()
            .map(|v| {
                let diff = *v - mean;
                diff * diff
            })
            .sum::<Decimal>()
            / n;
        decimal_sqrt(variance)
    }

    pub fn output(&self) -> Option<BollingerOutput> {
        self.last
    }

    pub fn next_output(&mut self, value: Decimal) -> Option<BollingerOutput> {
        self.last = self.sma.next(value).map(|middle| {
            let width = self.num_std * self.std_dev(middle);
            BollingerOutput {
                upper: middle + width,
                middle,
                lower: middle - width,
            }
        });
        self.last
    }
}

impl Indicator for BollingerBands {
    fn next(&mut self, value: Decimal) -> Option<Decimal> {
        self.next_output(value).map(|o| o.middle)
    }

    fn reset(&mut self) {
        self.sma.reset();
        self.last = None;
    }

    fn period(&self) -> usize {
        self.sma.period()
    }

    fn is_ready(&self) -> bool {
        self.last.is_some()
    }
}

/// Newton's method square root for Decimal. Non-positive input yields zero.
pub fn decimal_sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let epsilon = Decimal::new(1, 20);
    let mut guess = if value > Decimal::ONE { value / Decimal::TWO } else { Decimal::ONE };
    for _ in 0..100 {
        let next = (guess + value / guess) / Decimal::TWO;
        let diff = (next - guess).abs();
        guess = next;
        if diff < epsilon {
            break;
        }
    }
    guess
}
