//! Constant-product pool math.
//!
//! Pools charge 0.3% on the input side:
//!
//! ```text
//! amount_out = amount_in·997·reserve_out / (reserve_in·1000 + amount_in·997)
//! ```

use alloy_primitives::{keccak256, Address, U256};

use crate::env::RouterError;

const FEE_FACTOR: u64 = 997;
const FEE_SCALE: u64 = 1000;

/// Tokens of a pair in canonical (ascending) order
#[inline]
pub fn sort_tokens(a: Address, b: Address) -> (Address, Address) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Deterministic account holding the reserves of the `a`/`b` pool
pub fn pool_address(a: Address, b: Address) -> Address {
    let (token0, token1) = sort_tokens(a, b);
    let mut buf = [0u8; 40];
    buf[..20].copy_from_slice(token0.as_slice());
    buf[20..].copy_from_slice(token1.as_slice());
    Address::from_word(keccak256(buf))
}

/// Output of swapping `amount_in` against the given reserves
///
/// # Errors
///
/// * `InsufficientInputAmount` - `amount_in` is zero
/// * `InsufficientLiquidity` - either reserve is empty
/// * `InsufficientOutputAmount` - the output rounds down to zero
/// * `Overflow` - intermediate product overflows
pub fn get_amount_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> Result<U256, RouterError> {
    if amount_in.is_zero() {
        return Err(RouterError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(RouterError::InsufficientLiquidity);
    }
    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(FEE_FACTOR))
        .ok_or(RouterError::Overflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(RouterError::Overflow)?;
    let denominator = reserve_in
        .checked_mul(U256::from(FEE_SCALE))
        .and_then(|r| r.checked_add(amount_in_with_fee))
        .ok_or(RouterError::Overflow)?;

    let amount_out = numerator / denominator;
    if amount_out.is_zero() {
        return Err(RouterError::InsufficientOutputAmount);
    }
    Ok(amount_out)
}
