use rust_decimal::Decimal;
use swingsig_core::{ParamError, Trend};
use swingsig_indicators::series;
use swingsig_indicators::{IndicatorError, Warmup};

use crate::error::EngineError;

/// Classifies the latest close against simple moving averages of several
/// lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendClassifier {
    periods: Vec<usize>,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self {
            periods: vec![20, 50],
        }
    }
}

impl TrendClassifier {
    pub fn new(periods: Vec<usize>) -> Result<Self, ParamError> {
        if periods.is_empty() {
            return Err(ParamError::invalid(
                "trend_periods",
                "at least one moving-average period is required",
            ));
        }
        if periods.contains(&0) {
            return Err(ParamError::invalid(
                "trend_periods",
                "periods must be positive integers",
            ));
        }
        Ok(Self { periods })
    }

    pub fn periods(&self) -> &[usize] {
        &self.periods
    }

    pub fn classify(&self, closes: &[Decimal]) -> Result<Trend, EngineError> {
        let close = *closes.last().ok_or(IndicatorError::InsufficientData {
            indicator: "trend",
            required: 1,
            available: 0,
        })?;

        let averages = self
            .periods
            .iter()
            .map(|&period| latest_sma(closes, period))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(classify_against(close, &averages))
    }
}

fn latest_sma(closes: &[Decimal], period: usize) -> Result<Decimal, IndicatorError> {
    let tail = &closes[closes.len().saturating_sub(period)..];
    series::sma(tail, period, Warmup::Strict)?
        .last()
        .copied()
        .flatten()
        .ok_or(IndicatorError::InsufficientData {
            indicator: "SMA",
            required: period,
            available: closes.len(),
        })
}

/// Trend label for `close` given the latest value of each moving average.
pub fn classify_against(close: Decimal, averages: &[Decimal]) -> Trend {
    let above: Vec<bool> = averages.iter().map(|ma| close > *ma).collect();
    classify_flags(&above)
}

/// Arms are matched in a fixed order: all above, any above, none above.
/// The final arm is unreachable for boolean flags; it keeps every label
/// constructible from this function.
pub fn classify_flags(above: &[bool]) -> Trend {
    let all = above.iter().all(|&a| a);
    let any = above.iter().any(|&a| a);

    match (all, any) {
        (true, _) => Trend::StrongUptrend,
        (_, true) => Trend::WeakUptrend,
        (_, false) => Trend::StrongDowntrend,
        #[allow(unreachable_patterns)]
        _ => Trend::WeakDowntrend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strong_uptrend() {
        assert_eq!(
            classify_against(dec!(110), &[dec!(100), dec!(105)]),
            Trend::StrongUptrend
        );
    }

    #[test]
    fn test_mixed_is_weak_uptrend() {
        assert_eq!(
            classify_against(dec!(102), &[dec!(105), dec!(100)]),
            Trend::WeakUptrend
        );
        assert_eq!(
            classify_against(dec!(102), &[dec!(100), dec!(105)]),
            Trend::WeakUptrend
        );
    }

    #[test]
    fn test_strong_downtrend() {
        assert_eq!(
            classify_against(dec!(90), &[dec!(100), dec!(105)]),
            Trend::StrongDowntrend
        );
        // equal to the average is not above it
        assert_eq!(
            classify_against(dec!(100), &[dec!(100), dec!(100)]),
            Trend::StrongDowntrend
        );
    }

    #[test]
    fn test_classify_flags_arm_order() {
        assert_eq!(classify_flags(&[true, true]), Trend::StrongUptrend);
        assert_eq!(classify_flags(&[false, true]), Trend::WeakUptrend);
        assert_eq!(classify_flags(&[true, false]), Trend::WeakUptrend);
        assert_eq!(classify_flags(&[false, false]), Trend::StrongDowntrend);
        // Vacuously all above.
        assert_eq!(classify_flags(&[]), Trend::StrongUptrend);
    }

    #[test]
    fn test_classify_from_closes() {
        // 50 closes rising 1..=50: MA20 = 40.5, MA50 = 25.5, last close 50.
        let closes: Vec<Decimal> = (1..=50).map(Decimal::from).collect();
        let classifier = TrendClassifier::default();
        assert_eq!(classifier.classify(&closes).unwrap(), Trend::StrongUptrend);

        let falling: Vec<Decimal> = closes.iter().rev().copied().collect();
        assert_eq!(classifier.classify(&falling).unwrap(), Trend::StrongDowntrend);
    }

    #[test]
    fn test_classify_pullback_is_weak() {
        // Long uptrend, then a sharp drop below the 20-bar average only.
        let mut closes: Vec<Decimal> = (1..=49).map(Decimal::from).collect();
        closes.push(dec!(35));
        let trend = TrendClassifier::default().classify(&closes).unwrap();
        assert_eq!(trend, Trend::WeakUptrend);
    }

    #[test]
    fn test_short_history_is_insufficient() {
        let closes: Vec<Decimal> = (1..=30).map(Decimal::from).collect();
        let err = TrendClassifier::default().classify(&closes).unwrap_err();
        assert!(err.is_insufficient_data());
        assert!(TrendClassifier::default().classify(&[]).is_err());
    }

    #[test]
    fn test_invalid_periods() {
        assert!(TrendClassifier::new(vec![]).is_err());
        assert!(TrendClassifier::new(vec![20, 0]).is_err());
        assert_eq!(TrendClassifier::new(vec![10]).unwrap().periods(), &[10]);
    }
}
