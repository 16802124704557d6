//! Adapter layer: converts between the simulation's f64 prices and the
//! portfolio ledger's Decimal amounts.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Convert f64 to Decimal (lossy but sufficient for simulated prices).
pub fn to_decimal(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Cost of `shares` at a simulated `price`.
pub fn notional(shares: u64, price: f64) -> Decimal {
    Decimal::from(shares) * to_decimal(price)
}
