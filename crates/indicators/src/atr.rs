use crate::Indicator;
use rust_decimal::Decimal;

/// Average True Range (ATR), Wilder-smoothed.
///
/// True range is `max(high - low, |high - prev_close|, |low - prev_close|)`;
/// the very first bar has no previous close and contributes `high - low`.
/// The first ATR is the mean of the first `period` true ranges.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<Decimal>,
    seen: usize,
    seed_sum: Decimal,
    current: Option<Decimal>,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "ATR period must be > 0");
        Self {
            period,
            prev_close: None,
            seen: 0,
            seed_sum: Decimal::ZERO,
            current: None,
        }
    }

    /// Feed high, low, close and compute ATR.
    pub fn next_hlc(&mut self, high: Decimal, low: Decimal, close: Decimal) -> Option<Decimal> {
        let tr = true_range(high, low, self.prev_close);
        self.prev_close = Some(close);

        let n = Decimal::from(self.period);
        self.current = match self.current {
            Some(prev) => Some((prev * (n - Decimal::ONE) + tr) / n),
            None => {
                self.seen += 1;
                self.seed_sum += tr;
                (self.seen == self.period).then(|| self.seed_sum / n)
            }
        };
        self.current
    }

    pub fn value(&self) -> Option<Decimal> {
        self.current
    }
}

/// True range of one bar given the previous close, if any.
pub fn true_range(high: Decimal, low: Decimal, prev_close: Option<Decimal>) -> Decimal {
    let range = high - low;
    match prev_close {
        Some(pc) => range.max((high - pc).abs()).max((low - pc).abs()),
        None => range,
    }
}

impl Indicator for Atr {
    /// Close-only feed: the bar is treated as `high == low == close`, so the
    /// true range reduces to the absolute close-to-close change.
    fn next(&mut self, value: Decimal) -> Option<Decimal> {
        self.next_hlc(value, value, value)
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.seen = 0;
        self.seed_sum = Decimal::ZERO;
        self.current = None;
    }

    fn period(&self) -> usize {
        self.period
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_true_range_uses_gap() {
        assert_eq!(true_range(dec!(12), dec!(10), None), dec!(2));
        // gap up: |12 - 8| dominates
        assert_eq!(true_range(dec!(12), dec!(11), Some(dec!(8))), dec!(4));
        // gap down: |9 - 13| dominates
        assert_eq!(true_range(dec!(10), dec!(9), Some(dec!(13))), dec!(4));
    }

    #[test]
    fn test_atr_seed_then_wilder() {
        let mut atr = Atr::new(3);
        assert_eq!(atr.next_hlc(dec!(11), dec!(9), dec!(10)), None); // TR 2
        assert_eq!(atr.next_hlc(dec!(12), dec!(10), dec!(11)), None); // TR 2
        // TR max(3, 3, 0) = 3 -> seed (2 + 2 + 3) / 3
        let seed = atr.next_hlc(dec!(14), dec!(11), dec!(13)).unwrap();
        assert_eq!(seed.round_dp(6), dec!(2.333333));
        // TR max(1, 0, 1) = 1 -> (seed * 2 + 1) / 3
        let next = atr.next_hlc(dec!(13), dec!(12), dec!(12)).unwrap();
        assert_eq!(next, (seed * dec!(2) + dec!(1)) / dec!(3));
    }

    #[test]
    fn test_atr_close_only_feed() {
        let mut atr = Atr::new(2);
        assert_eq!(atr.next(dec!(10)), None); // TR 0
        assert_eq!(atr.next(dec!(12)), Some(dec!(1))); // TR 2
        atr.reset();
        assert!(!atr.is_ready());
    }
}
