//! Amount conversion between raw on-chain units and human-readable strings.

use alloy::primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::{AppError, Result};

/// `10^decimals` as U256.
pub fn unit(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Format a U256 value with decimals to a human-readable string.
///
/// Trailing fractional zeros are dropped, so `1.50` renders as `1.5`.
pub fn format_units(value: U256, decimals: u8) -> String {
    if value == U256::ZERO {
        return "0".to_string();
    }

    let value_str = value.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return value_str;
    }

    let len = value_str.len();
    if len <= decimals {
        let zeros = decimals - len;
        let decimal_part = value_str.trim_end_matches('0');
        format!("0.{}{}", "0".repeat(zeros), decimal_part)
    } else {
        let (integer, decimal) = value_str.split_at(len - decimals);
        let decimal = decimal.trim_end_matches('0');
        if decimal.is_empty() {
            integer.to_string()
        } else {
            format!("{}.{}", integer, decimal)
        }
    }
}

/// Parse a human-readable amount string to U256 with decimals.
///
/// Fraction digits beyond `decimals` are truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err(AppError::Parse("Amount cannot be empty".to_string()));
    }

    if amount.starts_with('-') {
        return Err(AppError::Parse("Amount cannot be negative".to_string()));
    }

    let multiplier = unit(decimals);
    let decimals = decimals as usize;
    let parts: Vec<&str> = amount.split('.').collect();

    let (integer, fraction) = match parts.as_slice() {
        [integer] => (*integer, String::new()),
        [integer, fraction] => {
            let mut fraction = fraction.to_string();
            fraction.truncate(decimals);
            (*integer, fraction)
        }
        _ => return Err(AppError::Parse(format!("Invalid amount format: {}", amount))),
    };

    let integer_value = if integer.is_empty() {
        U256::ZERO
    } else {
        parse_digits(integer, "integer")?
    };

    let fraction_value = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals);
        parse_digits(&padded, "fraction")?
    };

    integer_value
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| AppError::NumericOverflow(format!("Amount {} is too large", amount)))
}

/// Digits only; anything that then fails to parse is too big for U256.
fn parse_digits(digits: &str, part: &str) -> Result<U256> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Parse(format!("Invalid {} part: '{}' is not a number", part, digits)));
    }
    U256::from_str(digits)
        .map_err(|_| AppError::NumericOverflow(format!("{} part {} is too large", part, digits)))
}

/// Convert U256 to Decimal with proper scaling.
pub fn to_decimal(value: U256, decimals: u8) -> Result<Decimal> {
    let formatted = format_units(value, decimals);
    Decimal::from_str(&formatted).map_err(|_| {
        AppError::NumericOverflow(format!("{} does not fit a decimal display value", formatted))
    })
}

/// Format with exactly `dp` fraction digits, rounding half away from zero.
///
/// Values too large for a display decimal fall back to [`format_units`].
pub fn format_fixed(value: U256, decimals: u8, dp: u32) -> String {
    match to_decimal(value, decimals) {
        Ok(d) => {
            let rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", dp as usize, rounded)
        }
        Err(_) => format_units(value, decimals),
    }
}

/// Whole-token part of a raw amount.
pub fn whole_units(value: U256, decimals: u8) -> U256 {
    value / unit(decimals)
}
