use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use swingsig_core::ParamError;

/// Risk settings, all expressed as percentages.
///
/// - `stop_loss` / `take_profit`: distance from the entry price.
/// - `max_position_size`: largest position as a share of account equity.
/// - `risk_per_trade`: equity lost if the stop is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskParams")]
pub struct RiskParams {
    stop_loss: Decimal,
    take_profit: Decimal,
    max_position_size: Decimal,
    risk_per_trade: Decimal,
}

impl RiskParams {
    pub fn new(
        stop_loss: Decimal,
        take_profit: Decimal,
        max_position_size: Decimal,
        risk_per_trade: Decimal,
    ) -> Result<Self, ParamError> {
        RawRiskParams {
            stop_loss,
            take_profit,
            max_position_size,
            risk_per_trade,
        }
        .try_into()
    }

    pub fn stop_loss(&self) -> Decimal {
        self.stop_loss
    }

    pub fn take_profit(&self) -> Decimal {
        self.take_profit
    }

    pub fn max_position_size(&self) -> Decimal {
        self.max_position_size
    }

    pub fn risk_per_trade(&self) -> Decimal {
        self.risk_per_trade
    }
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            stop_loss: dec!(2.0),
            take_profit: dec!(6.0),
            max_position_size: dec!(5.0),
            risk_per_trade: dec!(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct RawRiskParams {
    stop_loss: Decimal,
    take_profit: Decimal,
    max_position_size: Decimal,
    risk_per_trade: Decimal,
}

impl Default for RawRiskParams {
    fn default() -> Self {
        let d = RiskParams::default();
        Self {
            stop_loss: d.stop_loss,
            take_profit: d.take_profit,
            max_position_size: d.max_position_size,
            risk_per_trade: d.risk_per_trade,
        }
    }
}

impl TryFrom<RawRiskParams> for RiskParams {
    type Error = ParamError;

    fn try_from(raw: RawRiskParams) -> Result<Self, Self::Error> {
        let percentages = [
            ("stop_loss", raw.stop_loss),
            ("take_profit", raw.take_profit),
            ("max_position_size", raw.max_position_size),
            ("risk_per_trade", raw.risk_per_trade),
        ];
        for (name, value) in percentages {
            if value < Decimal::ZERO {
                return Err(ParamError::invalid(
                    name,
                    format!("percentage must not be negative, got {}", value),
                ));
            }
        }
        // A zero stop is accepted here; the calculators report it as a
        // division by zero.
        if raw.stop_loss >= Decimal::ONE_HUNDRED {
            return Err(ParamError::invalid(
                "stop_loss",
                format!("{}% would place the stop at or below zero", raw.stop_loss),
            ));
        }

        Ok(Self {
            stop_loss: raw.stop_loss,
            take_profit: raw.take_profit,
            max_position_size: raw.max_position_size,
            risk_per_trade: raw.risk_per_trade,
        })
    }
}
