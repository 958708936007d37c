//! Fixed-point amount codec
//! All functions here must be deterministic and side-effect free
//!
//! Converts between the decimal strings a user types and integer base units
//! (`decimal × 10^decimals`). Fractional digits beyond the token's precision
//! are truncated, never rounded up.

use std::str::FromStr;
use candid::Nat;
use num_bigint::BigUint;
use num_traits::Zero;
use rust_decimal::Decimal;
use crate::infrastructure::constants::UINT256_BITS;
use crate::infrastructure::errors::{Result, SwapError, ValidationError};

/// Convert a user-entered decimal string to base units
///
/// ## Returns
/// - `Ok(Some(amount))` for a positive amount
/// - `Ok(None)` when there is no amount: empty input, zero, or a value that
///   truncates to zero at this precision
/// - `Err(InvalidAmount)` for anything that is not a non-negative base-10
///   number with an optional fractional part, or whose base units do not
///   fit a uint256
///
/// ## Examples
/// - `("0.5", 18)` → `500000000000000000`
/// - `("1.2345678", 6)` → `1234567` (seventh digit truncated)
/// - `("", 6)` → `None`
pub fn to_base_units(decimal: &str, decimals: u8) -> Result<Option<Nat>> {
    let text = decimal.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid_amount(decimal, "no digits"));
    }

    // Rejects signs, exponents, separators and a second '.'
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_amount(decimal, "expected a non-negative decimal number"));
    }

    let precision = decimals as usize;
    let kept = &fraction[..fraction.len().min(precision)];
    if kept.len() < fraction.len() {
        log::debug!(
            "Truncating '{}' to {} fractional digits",
            text, precision
        );
    }

    let mut digits = String::with_capacity(whole.len() + precision);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(precision - kept.len()));

    if digits.is_empty() {
        return Ok(None);
    }

    let value = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| invalid_amount(decimal, "not a base-10 number"))?;

    if value.bits() > UINT256_BITS {
        return Err(invalid_amount(decimal, "exceeds the largest uint256"));
    }

    if value.is_zero() {
        Ok(None)
    } else {
        Ok(Some(Nat::from(value)))
    }
}

/// Format base units as a decimal string for display
///
/// Trailing fractional zeros are dropped, and so is the point when nothing
/// follows it. Lossless for any value produced by `to_base_units`.
pub fn from_base_units(amount: &Nat, decimals: u8) -> String {
    let digits = amount.0.to_str_radix(10);
    let precision = decimals as usize;

    if precision == 0 {
        return digits;
    }

    let padded = if digits.len() <= precision {
        let mut padded = "0".repeat(precision - digits.len() + 1);
        padded.push_str(&digits);
        padded
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - precision);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Output units received per input unit, for logs and diagnostics
///
/// Returns `None` when either side is zero or does not fit a `Decimal`.
pub fn exchange_rate(amount_in: &Nat, decimals_in: u8, amount_out: &Nat, decimals_out: u8) -> Option<Decimal> {
    let input = Decimal::from_str(&from_base_units(amount_in, decimals_in)).ok()?;
    let output = Decimal::from_str(&from_base_units(amount_out, decimals_out)).ok()?;

    if input.is_zero() {
        return None;
    }

    output.checked_div(input)
}

fn invalid_amount(amount: &str, reason: &str) -> SwapError {
    SwapError::Validation(ValidationError::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.to_string(),
    })
}

// ===== Tests =====
