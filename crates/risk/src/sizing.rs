use crate::params::RiskParams;
use crate::RiskError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whole-unit position derived from the risk budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSize {
    pub quantity: Decimal,
    pub notional: Decimal,
    /// Equity lost if the stop is hit at this quantity.
    pub capital_at_risk: Decimal,
}

/// Size a position so a stop-out costs at most `risk_per_trade` percent of
/// equity, capped at `max_position_size` percent of equity in notional.
pub fn position_size(
    equity: Decimal,
    entry_price: Decimal,
    params: &RiskParams,
) -> Result<PositionSize, RiskError> {
    if entry_price.is_zero() {
        return Err(RiskError::DivideByZero {
            quantity: "position_size",
        });
    }
    let per_unit_risk = entry_price * params.stop_loss() / Decimal::ONE_HUNDRED;
    if per_unit_risk.is_zero() {
        return Err(RiskError::DivideByZero {
            quantity: "position_size",
        });
    }

    let risk_budget = equity * params.risk_per_trade() / Decimal::ONE_HUNDRED;
    let by_risk = risk_budget / per_unit_risk;
    let by_cap = equity * params.max_position_size() / Decimal::ONE_HUNDRED / entry_price;
    let quantity = by_risk.min(by_cap).floor().max(Decimal::ZERO);

    Ok(PositionSize {
        quantity,
        notional: quantity * entry_price,
        capital_at_risk: quantity * per_unit_risk,
    })
}
