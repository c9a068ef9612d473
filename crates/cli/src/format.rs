use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use swingsig_core::{Signal, SignalStrength, SignalType};

const THOUSAND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Render a number with a K/M/B suffix once it reaches a thousand.
pub fn format_compact(number: Decimal, precision: u32) -> String {
    let (scaled, suffix) = if number >= BILLION {
        (number / BILLION, "B")
    } else if number >= MILLION {
        (number / MILLION, "M")
    } else if number >= THOUSAND {
        (number / THOUSAND, "K")
    } else {
        (number, "")
    };
    format!("{}{}", fixed(scaled, precision), suffix)
}

/// Fixed-point rendering with exactly `precision` decimals.
pub fn fixed(number: Decimal, precision: u32) -> String {
    let rounded = number.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", precision as usize, rounded)
}

/// Like [`fixed`], with an explicit `+` on positive values.
pub fn signed(number: Decimal, precision: u32) -> String {
    let text = fixed(number, precision);
    if number > Decimal::ZERO {
        format!("+{text}")
    } else {
        text
    }
}

/// Optional value, or a dash while the indicator is warming up.
pub fn optional(value: Option<Decimal>, precision: u32) -> String {
    value.map_or_else(|| "-".to_string(), |v| format_compact(v, precision))
}

/// Presentation hints for one signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalMessage {
    pub badge: &'static str,
    pub color: &'static str,
    pub message: String,
}

pub fn signal_message(signal: &Signal) -> SignalMessage {
    let badge = match signal.strength {
        SignalStrength::Strong => "🔥",
        SignalStrength::Medium => "⚡",
        SignalStrength::Weak => "💡",
    };
    let color = match signal.kind {
        SignalType::Buy => "green",
        SignalType::Sell => "red",
        SignalType::Alert => "yellow",
    };
    SignalMessage {
        badge,
        color,
        message: format!("{}: {}", signal.indicator, signal.reason),
    }
}
