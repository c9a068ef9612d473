use swingsig_core::ParamError;
use swingsig_indicators::IndicatorError;
use swingsig_risk::RiskError;

/// Any failure of a single engine call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error(transparent)]
    Risk(#[from] RiskError),
}

impl EngineError {
    /// The series is valid but too short; more history will resolve it.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            EngineError::Indicator(IndicatorError::InsufficientData { .. })
        )
    }

    /// The configuration itself is unusable.
    pub fn is_misconfigured(&self) -> bool {
        matches!(
            self,
            EngineError::Param(_)
                | EngineError::Indicator(IndicatorError::InvalidPeriod { .. })
                | EngineError::Risk(RiskError::DivideByZero { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let short: EngineError = IndicatorError::InsufficientData {
            indicator: "RSI",
            required: 15,
            available: 3,
        }
        .into();
        assert!(short.is_insufficient_data());
        assert!(!short.is_misconfigured());
        assert_eq!(
            short.to_string(),
            "Insufficient data for RSI: need 15 points, have 3"
        );

        let bad: EngineError =
            ParamError::invalid("rsi", "window must be a positive integer").into();
        assert!(bad.is_misconfigured());
        assert!(!bad.is_insufficient_data());

        let zero: EngineError = RiskError::DivideByZero {
            quantity: "risk_reward_ratio",
        }
        .into();
        assert!(zero.is_misconfigured());
    }
}
