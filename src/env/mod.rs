//! External collaborators of the settlement engine.
//!
//! The engine never prices swaps or keeps token balances itself. It talks to
//! three seams:
//!
//! - [`TokenLedger`]: fungible token balances and allowances
//! - [`SwapRouter`]: AMM quoting and exact-input swaps along a token path
//! - [`Journal`]: checkpoint / revert of everything the other two touched
//!
//! A fill runs between `checkpoint` and `commit`; any failure reverts the
//! environment to the checkpoint, so a failed fill leaves no transfer
//! behind. [`crate::sim::SimChain`] is an in-memory implementation.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Token transfer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("insufficient allowance")]
    InsufficientAllowance,

    #[error("balance overflow")]
    Overflow,
}

/// Router failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("invalid path")]
    InvalidPath,

    #[error("pair not found")]
    PairNotFound,

    #[error("insufficient input amount")]
    InsufficientInputAmount,

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    #[error("expired")]
    Expired,

    #[error("overflow")]
    Overflow,

    #[error("transfer: {0}")]
    Transfer(#[from] LedgerError),
}

/// Multi-token balance and allowance surface.
pub trait TokenLedger {
    fn balance_of(&self, token: Address, account: Address) -> U256;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    /// Set `spender`'s allowance over `owner`'s balance of `token`
    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Move `amount` of `token` from `from` to `to`
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Move `amount` of `token` from `from` to `to`, spending `spender`'s
    /// allowance
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;
}

/// AMM router surface.
pub trait SwapRouter {
    /// Account the router spends allowances as
    fn router_address(&self) -> Address;

    /// Quoted amounts for every hop of `path`, starting with `amount_in`
    fn get_amounts_out(&self, amount_in: U256, path: &[Address]) -> Result<Vec<U256>, RouterError>;

    /// Swap exactly `amount_in` of `path[0]` pulled from `sender`; the output
    /// of the last hop is sent to `to`. Returns the amounts of every hop.
    fn swap_exact_tokens_for_tokens(
        &mut self,
        sender: Address,
        amount_in: U256,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<U256>, RouterError>;
}

/// Handle returned by [`Journal::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(pub usize);

/// All-or-nothing support for external state.
pub trait Journal {
    fn checkpoint(&mut self) -> Checkpoint;

    /// Discard every change made since `checkpoint`
    fn revert_to(&mut self, checkpoint: Checkpoint);

    /// Keep every change made since `checkpoint`
    fn commit(&mut self, checkpoint: Checkpoint);
}

/// Everything the settlement engine needs from the outside world.
pub trait Environment: TokenLedger + SwapRouter + Journal {}

impl<T: TokenLedger + SwapRouter + Journal> Environment for T {}

/// Who is calling and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxContext {
    /// Immediate caller
    pub sender: Address,
    /// Account that originated the transaction
    pub origin: Address,
    /// Current unix time in seconds
    pub timestamp: u64,
}

impl TxContext {
    /// A call made directly by `account`
    pub fn direct(account: Address, timestamp: u64) -> Self {
        Self {
            sender: account,
            origin: account,
            timestamp,
        }
    }

    /// A call relayed through the intermediary contract `via`
    pub fn relayed(origin: Address, via: Address, timestamp: u64) -> Self {
        Self {
            sender: via,
            origin,
            timestamp,
        }
    }

    /// True when the immediate caller is the originating account
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.sender == self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_context_direct() {
        let account = Address::repeat_byte(1);
        let tx = TxContext::direct(account, 100);

        assert!(tx.is_direct());
        assert_eq!(tx.sender, account);
        assert_eq!(tx.timestamp, 100);
    }

    #[test]
    fn test_tx_context_relayed() {
        let tx = TxContext::relayed(Address::repeat_byte(1), Address::repeat_byte(2), 0);
        assert!(!tx.is_direct());
    }

    #[test]
    fn test_router_error_from_ledger() {
        let err: RouterError = LedgerError::InsufficientAllowance.into();
        assert_eq!(err, RouterError::Transfer(LedgerError::InsufficientAllowance));
    }
}
