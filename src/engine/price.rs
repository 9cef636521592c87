use ethers::types::U256;
use ethers::utils::{parse_units, ParseUnits};
use rust_decimal::Decimal;

use crate::error::RemoteError;

/// Render a decimal value at the given number of significant digits, with
/// trailing zeros stripped.
pub fn to_significant(value: Decimal, sig_figs: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let rounded = value.round_sf(sig_figs).unwrap_or(value);
    rounded.normalize().to_string()
}

/// Multiplicative inverse of a price; `None` for zero.
pub fn invert(value: Decimal) -> Option<Decimal> {
    if value.is_zero() {
        None
    } else {
        Decimal::ONE.checked_div(value)
    }
}

/// Scale a decimal rate string into an integer amount at the given token
/// precision (the on-chain representation). Negative rates are rejected.
pub fn parse_rate(rate: &str, decimals: u32) -> Result<U256, RemoteError> {
    match parse_units(rate, decimals)? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err("rate must not be negative".into()),
    }
}

/// True when the entered price string parses as a strictly positive number.
pub fn is_positive_price(raw: &str) -> bool {
    raw.trim()
        .parse::<Decimal>()
        .map(|d| d > Decimal::ZERO)
        .unwrap_or(false)
}
