//! Batch receipt for `fill_orders` results.
//!
//! The BatchReceipt keeps one outcome per submitted fill request, in
//! submission order, together with the book's state root after the batch.

use alloy_primitives::B256;
use rust_decimal::Decimal;

use crate::error::Error;
use crate::types::FillReceipt;

/// Per-request outcomes of a fill batch.
///
/// ## Purpose
///
/// A batch tolerates individual failures: a request that fails leaves no
/// trace in the book or the environment, and its error is kept here at the
/// request's position. The batch as a whole only fails when nothing was
/// filled.
///
/// ## Example
///
/// ```
/// use alloy_primitives::B256;
/// use limit_orderbook::error::Error;
/// use limit_orderbook::types::BatchReceipt;
///
/// let receipt = BatchReceipt::new(vec![Err(Error::OrderCanceled)], B256::ZERO);
///
/// assert_eq!(receipt.requests_processed(), 1);
/// assert_eq!(receipt.fills_executed(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReceipt {
    /// One entry per request, in submission order
    pub outcomes: Vec<Result<FillReceipt, Error>>,

    /// Book state root after the batch
    pub state_root: B256,
}

impl BatchReceipt {
    pub fn new(outcomes: Vec<Result<FillReceipt, Error>>, state_root: B256) -> Self {
        Self {
            outcomes,
            state_root,
        }
    }

    /// Number of requests in the batch
    pub fn requests_processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of requests that filled
    pub fn fills_executed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Successful fills in submission order
    pub fn filled(&self) -> impl Iterator<Item = &FillReceipt> + '_ {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// Failed requests as `(position, error)`
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> + '_ {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().err().map(|e| (i, e)))
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// Check if this receipt represents an empty batch
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Fraction of requests that filled; None for an empty batch
    pub fn fill_rate(&self) -> Option<Decimal> {
        if self.outcomes.is_empty() {
            return None;
        }
        Decimal::from(self.fills_executed() as u64)
            .checked_div(Decimal::from(self.requests_processed() as u64))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    fn fill(n: u8) -> FillReceipt {
        FillReceipt {
            hash: B256::repeat_byte(n),
            relayer: Address::repeat_byte(9),
            amount_in: U256::from(100),
            amount_out: U256::from(200),
            fee: U256::ZERO,
            fee_split: U256::ZERO,
            fee_split_out: U256::ZERO,
            filled_amount_in: U256::from(100),
            fully_filled: true,
        }
    }

    #[test]
    fn test_receipt_counts() {
        let receipt = BatchReceipt::new(
            vec![Err(Error::OrderCanceled), Ok(fill(2)), Err(Error::OrderExpired)],
            B256::ZERO,
        );

        assert_eq!(receipt.requests_processed(), 3);
        assert_eq!(receipt.fills_executed(), 1);
        assert_eq!(receipt.filled().count(), 1);
        assert_eq!(receipt.filled().next().map(|f| f.hash), Some(B256::repeat_byte(2)));
    }

    #[test]
    fn test_receipt_failures_keep_positions() {
        let receipt = BatchReceipt::new(
            vec![Err(Error::OrderCanceled), Ok(fill(2)), Err(Error::OrderExpired)],
            B256::ZERO,
        );

        let failures: Vec<_> = receipt.failures().collect();
        assert_eq!(
            failures,
            vec![(0, &Error::OrderCanceled), (2, &Error::OrderExpired)]
        );
    }

    #[test]
    fn test_receipt_is_empty() {
        assert!(BatchReceipt::new(Vec::new(), B256::ZERO).is_empty());
        assert!(!BatchReceipt::new(vec![Ok(fill(1))], B256::ZERO).is_empty());
    }

    #[test]
    fn test_receipt_fill_rate() {
        let receipt = BatchReceipt::new(
            vec![Ok(fill(1)), Err(Error::AlreadyFilled)],
            B256::ZERO,
        );
        assert_eq!(receipt.fill_rate(), Some(Decimal::new(5, 1)));
        assert_eq!(BatchReceipt::new(Vec::new(), B256::ZERO).fill_rate(), None);
    }

    #[test]
    fn test_receipt_state_root_hex() {
        let receipt = BatchReceipt::new(Vec::new(), B256::repeat_byte(0xAB));

        let hex = receipt.state_root_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
    }
}
