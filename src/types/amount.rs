//! Token amount arithmetic and conversions.
//!
//! ## Overview
//!
//! Amounts are raw integer base units (`U256`). A token with 18 decimals
//! represents `1.5` as `1_500_000_000_000_000_000`. No floating point is
//! used anywhere; human-readable values go through `rust_decimal`.
//!
//! ## Examples
//!
//! ```
//! use alloy_primitives::U256;
//! use limit_orderbook::types::amount::{format_units, parse_units};
//!
//! let amount = parse_units("1.5", 18).unwrap();
//! assert_eq!(amount, U256::from(1_500_000_000_000_000_000u128));
//! assert_eq!(format_units(amount, 18), "1.5");
//! ```

use alloy_primitives::U256;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Denominator of the fee split fraction
pub const FEE_SPLIT_DENOMINATOR: u64 = 10_000;

// ============================================================================
// Arithmetic
// ============================================================================

/// `value × numerator / denominator`, rounded down
///
/// # Errors
///
/// `Overflow` if the product overflows or the denominator is zero.
pub fn mul_div(value: U256, numerator: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(Error::Overflow);
    }
    let product = value.checked_mul(numerator).ok_or(Error::Overflow)?;
    Ok(product / denominator)
}

/// `value × numerator / denominator`, rounded up
///
/// # Errors
///
/// `Overflow` if the product overflows or the denominator is zero.
pub fn mul_div_up(value: U256, numerator: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(Error::Overflow);
    }
    let product = value.checked_mul(numerator).ok_or(Error::Overflow)?;
    let quotient = product / denominator;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1))
    }
}

/// Minimum output owed for filling `fill_amount_in` of an order, scaled
/// pro-rata from the order's `min_amount_out` for `amount_in`
///
/// Rounded up, so a fill never owes less than its exact share.
///
/// # Example
///
/// ```
/// use alloy_primitives::U256;
/// use limit_orderbook::types::amount::pro_rata_min_out;
///
/// // Quarter of an order asking 400 for 100 must return at least 100
/// let min = pro_rata_min_out(U256::from(400), U256::from(25), U256::from(100)).unwrap();
/// assert_eq!(min, U256::from(100));
///
/// // Two units of an order asking 999 for 1000 owe 2, not 1
/// let min = pro_rata_min_out(U256::from(999), U256::from(2), U256::from(1000)).unwrap();
/// assert_eq!(min, U256::from(2));
/// ```
pub fn pro_rata_min_out(
    min_amount_out: U256,
    fill_amount_in: U256,
    amount_in: U256,
) -> Result<U256> {
    mul_div_up(min_amount_out, fill_amount_in, amount_in)
}

/// True if `amount_out` for `fill_amount_in` pays at least the order's
/// rate, checked as `amount_out × amount_in ≥ min_amount_out × fill_amount_in`
///
/// # Errors
///
/// `Overflow` if either product overflows.
pub fn meets_min_out(
    amount_out: U256,
    fill_amount_in: U256,
    min_amount_out: U256,
    amount_in: U256,
) -> Result<bool> {
    let paid = amount_out.checked_mul(amount_in).ok_or(Error::Overflow)?;
    let owed = min_amount_out
        .checked_mul(fill_amount_in)
        .ok_or(Error::Overflow)?;
    Ok(paid >= owed)
}

/// Relayer fee on `amount`
pub fn fee_of(amount: U256, fee_numerator: u64, fee_denominator: u64) -> Result<U256> {
    mul_div(amount, U256::from(fee_numerator), U256::from(fee_denominator))
}

/// Part of `fee` routed to the fee-split recipient
pub fn split_of(fee: U256, fee_split_numerator: u64) -> Result<U256> {
    mul_div(
        fee,
        U256::from(fee_split_numerator),
        U256::from(FEE_SPLIT_DENOMINATOR),
    )
}

// ============================================================================
// Conversion Functions
// ============================================================================

fn ten_pow(decimals: u32) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

/// Convert a decimal string to base units
///
/// Digits beyond `decimals` are rounded (banker's rounding, as
/// `rust_decimal` does).
///
/// # Returns
///
/// * `Some(U256)` - The base-unit amount
/// * `None` - If parsing fails or the value is negative
pub fn parse_units(s: &str, decimals: u32) -> Option<U256> {
    let value = Decimal::from_str(s).ok()?;
    if value.is_sign_negative() {
        return None;
    }
    let value = value.round_dp(decimals);
    let mantissa = u128::try_from(value.mantissa()).ok()?;
    let scale = value.scale();
    let factor = ten_pow(decimals.checked_sub(scale)?)?;
    U256::from(mantissa).checked_mul(factor)
}

/// Convert base units to a decimal string with trailing zeros trimmed
pub fn format_units(value: U256, decimals: u32) -> String {
    let Some(factor) = ten_pow(decimals) else {
        return value.to_string();
    };
    let whole = value / factor;
    let fraction = value % factor;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Convert base units to a `Decimal` scaled by `decimals`
///
/// Returns `None` if the value exceeds `Decimal`'s 96-bit mantissa.
pub fn to_decimal(value: U256, decimals: u32) -> Option<Decimal> {
    let raw = u128::try_from(value).ok()?;
    let raw = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(raw, decimals).ok()
}

/// Output units per input unit, `None` when undefined or out of range
pub fn execution_price(amount_in: U256, amount_out: U256) -> Option<Decimal> {
    if amount_in.is_zero() {
        return None;
    }
    let input = Decimal::from_u128(u128::try_from(amount_in).ok()?)?;
    let output = Decimal::from_u128(u128::try_from(amount_out).ok()?)?;
    output.checked_div(input)
}

// ============================================================================
// Unit Tests
// ============================================================================
