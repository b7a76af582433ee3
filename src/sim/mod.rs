//! In-memory chain for tests, benchmarks and the demo binary.
//!
//! ## Architecture
//!
//! - **Ledger**: balances and allowances of every token
//! - **Pools**: constant-product pairs whose reserves are simply the pool
//!   account's ledger balances
//! - **Router**: quotes and multi-hop exact-input swaps over the pools
//! - **Journal**: a stack of full-state snapshots
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use limit_orderbook::env::{SwapRouter, TokenLedger};
//! use limit_orderbook::sim::SimChain;
//!
//! let weth = Address::repeat_byte(0x0e);
//! let dai = Address::repeat_byte(0x0d);
//! let lp = Address::repeat_byte(1);
//!
//! let mut chain = SimChain::new(1_700_000_000);
//! chain.mint(weth, lp, U256::from(1_000u64)).unwrap();
//! chain.mint(dai, lp, U256::from(100_000u64)).unwrap();
//! chain.add_liquidity(lp, weth, dai, U256::from(1_000u64), U256::from(100_000u64)).unwrap();
//!
//! let amounts = chain.get_amounts_out(U256::from(10u64), &[weth, dai]).unwrap();
//! assert_eq!(amounts[1], U256::from(987u64));
//! ```

pub mod ledger;
pub mod pool;

pub use ledger::Ledger;
pub use pool::{get_amount_out, pool_address, sort_tokens};

use std::collections::HashMap;

use alloy_primitives::{address, Address, U256};
use tracing::trace;

use crate::env::{Checkpoint, Journal, LedgerError, RouterError, SwapRouter, TokenLedger};

/// Default router account
pub const DEFAULT_ROUTER: Address = address!("7a250d5630b4cf539739df2c5dacb4c659f2488d");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct State {
    ledger: Ledger,

    /// Sorted token pair -> pool account
    pools: HashMap<(Address, Address), Address>,
}

/// Token ledger, AMM router and journal in one.
#[derive(Debug, Clone)]
pub struct SimChain {
    state: State,
    router: Address,
    timestamp: u64,
    snapshots: Vec<State>,
}

impl SimChain {
    /// Empty chain whose clock reads `timestamp`
    pub fn new(timestamp: u64) -> Self {
        Self {
            state: State::default(),
            router: DEFAULT_ROUTER,
            timestamp,
            snapshots: Vec::new(),
        }
    }

    /// Use `router` as the router account
    pub fn with_router(mut self, router: Address) -> Self {
        self.router = router;
        self
    }

    // ========================================================================
    // Clock
    // ========================================================================

    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    // ========================================================================
    // Tokens and Pools
    // ========================================================================

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.state.ledger.mint(token, to, amount)
    }

    /// Deposit `amount_a` of `token_a` and `amount_b` of `token_b` from
    /// `provider` into their pool, creating the pool if needed
    ///
    /// # Returns
    ///
    /// The pool account
    pub fn add_liquidity(
        &mut self,
        provider: Address,
        token_a: Address,
        token_b: Address,
        amount_a: U256,
        amount_b: U256,
    ) -> Result<Address, RouterError> {
        if token_a == token_b {
            return Err(RouterError::InvalidPath);
        }
        let pool = pool_address(token_a, token_b);

        let mut ledger = self.state.ledger.clone();
        ledger.transfer(token_a, provider, pool, amount_a)?;
        ledger.transfer(token_b, provider, pool, amount_b)?;
        self.state.ledger = ledger;
        self.state.pools.insert(sort_tokens(token_a, token_b), pool);

        trace!(pool = %pool, %amount_a, %amount_b, "liquidity added");
        Ok(pool)
    }

    /// Pool account of the `a`/`b` pair, if the pool exists
    pub fn pool(&self, a: Address, b: Address) -> Option<Address> {
        self.state.pools.get(&sort_tokens(a, b)).copied()
    }

    /// Reserves of the `a`/`b` pool, in argument order
    pub fn reserves(&self, a: Address, b: Address) -> Option<(U256, U256)> {
        let pool = self.pool(a, b)?;
        Some((
            self.state.ledger.balance_of(a, pool),
            self.state.ledger.balance_of(b, pool),
        ))
    }

    /// Price every hop of `path` against the reserves the previous hops
    /// leave behind, so a pair used twice sees its own first trade
    fn quote(&self, amount_in: U256, path: &[Address]) -> Result<Vec<U256>, RouterError> {
        if path.len() < 2 {
            return Err(RouterError::InvalidPath);
        }
        // (pool, token) -> reserve after the hops priced so far
        let mut reserves: HashMap<(Address, Address), U256> = HashMap::new();
        let reserve = |reserves: &HashMap<(Address, Address), U256>, pool: Address, token: Address| {
            reserves
                .get(&(pool, token))
                .copied()
                .unwrap_or_else(|| self.state.ledger.balance_of(token, pool))
        };

        let mut amounts = Vec::with_capacity(path.len());
        amounts.push(amount_in);
        let mut amount = amount_in;
        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let pool = self.pool(from, to).ok_or(RouterError::PairNotFound)?;
            let reserve_in = reserve(&reserves, pool, from);
            let reserve_out = reserve(&reserves, pool, to);
            let amount_out = get_amount_out(amount, reserve_in, reserve_out)?;

            let reserve_in = reserve_in.checked_add(amount).ok_or(RouterError::Overflow)?;
            let reserve_out = reserve_out
                .checked_sub(amount_out)
                .ok_or(RouterError::InsufficientLiquidity)?;
            reserves.insert((pool, from), reserve_in);
            reserves.insert((pool, to), reserve_out);

            amounts.push(amount_out);
            amount = amount_out;
        }
        Ok(amounts)
    }
}

impl TokenLedger for SimChain {
    fn balance_of(&self, token: Address, account: Address) -> U256 {
        self.state.ledger.balance_of(token, account)
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state.ledger.allowance(token, owner, spender)
    }

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.state.ledger.approve(token, owner, spender, amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.state.ledger.transfer(token, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.state.ledger.transfer_from(token, spender, from, to, amount)
    }
}

impl SwapRouter for SimChain {
    fn router_address(&self) -> Address {
        self.router
    }

    fn get_amounts_out(&self, amount_in: U256, path: &[Address]) -> Result<Vec<U256>, RouterError> {
        self.quote(amount_in, path)
    }

    fn swap_exact_tokens_for_tokens(
        &mut self,
        sender: Address,
        amount_in: U256,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<U256>, RouterError> {
        if deadline < self.timestamp {
            return Err(RouterError::Expired);
        }
        let amounts = self.quote(amount_in, path)?;
        let amount_out = amounts.last().copied().ok_or(RouterError::InvalidPath)?;
        if amount_out < amount_out_min {
            return Err(RouterError::InsufficientOutputAmount);
        }

        // Every hop settles on a scratch copy so a failing hop leaves no
        // partial transfer behind
        let mut ledger = self.state.ledger.clone();
        let first_pool = self.pool(path[0], path[1]).ok_or(RouterError::PairNotFound)?;
        ledger.transfer_from(path[0], self.router, sender, first_pool, amount_in)?;

        for (i, pair) in path.windows(2).enumerate() {
            let pool = self.pool(pair[0], pair[1]).ok_or(RouterError::PairNotFound)?;
            let recipient = match path.get(i + 2) {
                Some(next) => self.pool(pair[1], *next).ok_or(RouterError::PairNotFound)?,
                None => to,
            };
            ledger.transfer(pair[1], pool, recipient, amounts[i + 1])?;
        }
        self.state.ledger = ledger;

        trace!(%sender, %amount_in, %amount_out, hops = path.len() - 1, "swap executed");
        Ok(amounts)
    }
}

impl Journal for SimChain {
    fn checkpoint(&mut self) -> Checkpoint {
        self.snapshots.push(self.state.clone());
        Checkpoint(self.snapshots.len() - 1)
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) {
        if checkpoint.0 >= self.snapshots.len() {
            return;
        }
        self.snapshots.truncate(checkpoint.0 + 1);
        if let Some(state) = self.snapshots.pop() {
            self.state = state;
        }
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.snapshots.truncate(checkpoint.0);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
