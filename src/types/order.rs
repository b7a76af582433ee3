//! Signed limit order.
//!
//! An order says: "sell exactly `amount_in` of `source_token` for at least
//! `min_amount_out` of `destination_token`, paid to `recipient`, before
//! `deadline`". It is immutable once created and identified by its
//! structured hash (see [`crate::types::Domain`]).
//!
//! Amounts are raw token base units (`U256`), never floating point.

use alloy_primitives::{Address, U256};

use crate::error::{Error, Result};
use crate::registry::IndexKeys;

/// A maker's limit order.
///
/// ## Example
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use limit_orderbook::types::Order;
///
/// let maker = Address::repeat_byte(1);
/// let order = Order::new(
///     maker,
///     Address::repeat_byte(2),      // source token (e.g. WETH)
///     Address::repeat_byte(3),      // destination token (e.g. DAI)
///     U256::from(10u64).pow(U256::from(18)),
///     U256::from(100u64) * U256::from(10u64).pow(U256::from(18)),
///     1_900_000_000,                // deadline (unix seconds)
/// );
///
/// assert_eq!(order.recipient, maker);
/// assert!(order.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order {
    /// Account that signed the order and pays `amount_in`
    pub maker: Address,

    /// Token sold
    pub source_token: Address,

    /// Token bought
    pub destination_token: Address,

    /// Total amount of `source_token` to sell
    pub amount_in: U256,

    /// Minimum amount of `destination_token` for the whole `amount_in`
    pub min_amount_out: U256,

    /// Account receiving the bought tokens
    pub recipient: Address,

    /// Unix timestamp (seconds) after which the order can't be filled
    pub deadline: u64,
}

impl Order {
    /// Create an order paying out to the maker
    pub fn new(
        maker: Address,
        source_token: Address,
        destination_token: Address,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Self {
        Self {
            maker,
            source_token,
            destination_token,
            amount_in,
            min_amount_out,
            recipient: maker,
            deadline,
        }
    }

    /// Pay the bought tokens to `recipient` instead of the maker
    pub fn with_recipient(mut self, recipient: Address) -> Self {
        self.recipient = recipient;
        self
    }

    /// Check every field invariant, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.maker == Address::ZERO {
            return Err(Error::InvalidMaker);
        }
        if self.source_token == Address::ZERO {
            return Err(Error::InvalidSourceToken);
        }
        if self.destination_token == Address::ZERO {
            return Err(Error::InvalidDestinationToken);
        }
        if self.source_token == self.destination_token {
            return Err(Error::DuplicateTokens);
        }
        if self.amount_in.is_zero() {
            return Err(Error::InvalidAmountIn);
        }
        if self.min_amount_out.is_zero() {
            return Err(Error::InvalidAmountOutMin);
        }
        if self.recipient == Address::ZERO {
            return Err(Error::InvalidRecipient);
        }
        if self.deadline == 0 {
            return Err(Error::InvalidDeadline);
        }
        Ok(())
    }

    /// True once `now` is past the deadline. A zero deadline is always
    /// expired.
    #[inline]
    pub fn is_expired(&self, now: u64) -> bool {
        self.deadline == 0 || now > self.deadline
    }

    /// The registry keys this order is filed under
    pub fn index_keys(&self) -> IndexKeys {
        IndexKeys {
            maker: self.maker,
            source_token: self.source_token,
            destination_token: self.destination_token,
        }
    }

    /// True if `path` starts at the source token and ends at the
    /// destination token
    pub fn accepts_path(&self, path: &[Address]) -> bool {
        path.len() >= 2
            && path.first() == Some(&self.source_token)
            && path.last() == Some(&self.destination_token)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
