pub mod metrics;
pub mod params;
pub mod sizing;

pub use metrics::{compute, RiskMetrics};
pub use params::RiskParams;
pub use sizing::{position_size, PositionSize};

/// Errors raised while deriving risk figures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskError {
    #[error("Division by zero computing {quantity}")]
    DivideByZero { quantity: &'static str },
}
