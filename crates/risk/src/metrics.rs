use crate::params::RiskParams;
use crate::RiskError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Exit levels and reward ratio for a position opened at the latest close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub atr: Decimal,
    pub risk_reward_ratio: Decimal,
}

/// Compute stop-loss and take-profit prices around `latest_close`.
///
/// A zero stop-loss percentage has no finite risk/reward ratio and is
/// reported as [`RiskError::DivideByZero`] rather than an infinity.
pub fn compute(
    latest_close: Decimal,
    atr: Decimal,
    params: &RiskParams,
) -> Result<RiskMetrics, RiskError> {
    if params.stop_loss().is_zero() {
        return Err(RiskError::DivideByZero {
            quantity: "risk_reward_ratio",
        });
    }

    let metrics = RiskMetrics {
        stop_loss: latest_close * (Decimal::ONE - params.stop_loss() / Decimal::ONE_HUNDRED),
        take_profit: latest_close * (Decimal::ONE + params.take_profit() / Decimal::ONE_HUNDRED),
        atr,
        risk_reward_ratio: params.take_profit() / params.stop_loss(),
    };
    debug!(
        close = %latest_close,
        stop_loss = %metrics.stop_loss,
        take_profit = %metrics.take_profit,
        "Computed risk metrics"
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_levels() {
        let m = compute(dec!(100), dec!(1.75), &RiskParams::default()).unwrap();
        assert_eq!(m.stop_loss, dec!(98.0));
        assert_eq!(m.take_profit, dec!(106.0));
        assert_eq!(m.risk_reward_ratio, dec!(3.0));
        assert_eq!(m.atr, dec!(1.75));
    }

    #[test]
    fn test_custom_levels() {
        let params = RiskParams::new(dec!(5), dec!(10), dec!(5), dec!(1)).unwrap();
        let m = compute(dec!(250), dec!(4), &params).unwrap();
        assert_eq!(m.stop_loss, dec!(237.5));
        assert_eq!(m.take_profit, dec!(275));
        assert_eq!(m.risk_reward_ratio, dec!(2));
    }

    #[test]
    fn test_zero_stop_is_divide_by_zero() {
        let params = RiskParams::new(dec!(0), dec!(6), dec!(5), dec!(1)).unwrap();
        assert_eq!(
            compute(dec!(100), dec!(1), &params).unwrap_err(),
            RiskError::DivideByZero {
                quantity: "risk_reward_ratio"
            }
        );
    }
}
