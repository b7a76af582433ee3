//! Fill execution against the external pool.
//!
//! ## Fill Rules
//!
//! - The caller must be the originating account, never an intermediary
//! - Canceled and fully filled orders are rejected before anything else
//! - The maker's price bound holds pro-rata for partial fills
//! - Fees are taken in the source token before the swap
//!
//! ## Atomicity
//!
//! Everything a fill does to the environment happens between a journal
//! checkpoint and its commit. Any failure reverts to the checkpoint and
//! leaves the book untouched, so a failed fill is invisible.

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::env::{Environment, RouterError, SwapRouter, TxContext};
use crate::engine::fees::{check_fee, check_fee_split, FeeConfig};
use crate::error::{Error, Result};
use crate::events::Event;
use crate::orderbook::OrderBook;
use crate::types::amount::{meets_min_out, pro_rata_min_out};
use crate::types::{BatchReceipt, FillReceipt, FillRequest};

/// Settlement engine of one deployment.
///
/// The engine holds no order state of its own: fill progress lives in the
/// [`OrderBook`] and balances live in the [`Environment`]. It owns the fee
/// parameters and the account that briefly holds maker funds during a fill.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Account maker allowances are granted to
    address: Address,

    /// Only account allowed to change fees
    owner: Address,

    fees: FeeConfig,

    /// Pending administrative observations
    events: Vec<Event>,
}

impl Settlement {
    /// Create an engine at `address` administered by `owner`
    ///
    /// # Errors
    ///
    /// `FeeTooHigh` or `FeeSplitTooHigh` if `fees` is out of bounds.
    pub fn new(address: Address, owner: Address, fees: FeeConfig) -> Result<Self> {
        fees.validate()?;
        Ok(Self {
            address,
            owner,
            fees,
            events: Vec::new(),
        })
    }

    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    #[inline]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[inline]
    pub fn fees(&self) -> &FeeConfig {
        &self.fees
    }

    // ========================================================================
    // Fill
    // ========================================================================

    /// Fill (part of) one order
    ///
    /// # Arguments
    ///
    /// * `book` - Registry holding the order's fill state
    /// * `env` - Token ledger, router and journal
    /// * `tx` - Caller and current time
    /// * `request` - Order, signature, amount and swap path
    ///
    /// # Returns
    ///
    /// A receipt of the fill. The `OrderFilled` event is recorded in `book`.
    ///
    /// # Errors
    ///
    /// Preconditions are checked in this order: `CalledByContract`,
    /// `OrderCanceled`, `AlreadyFilled`, `InvalidSignature`, `InvalidPath`,
    /// `OrderExpired`, `InvalidFillAmount`. Execution can then fail with
    /// `TransferFailed`, `SwapFailed`, `InsufficientAmountOut` or
    /// `Overflow`, in which case every environment change is reverted.
    pub fn fill_order<E: Environment>(
        &self,
        book: &mut OrderBook,
        env: &mut E,
        tx: &TxContext,
        request: &FillRequest,
    ) -> Result<FillReceipt> {
        if !tx.is_direct() {
            return Err(Error::CalledByContract);
        }

        let order = &request.order;
        let hash = book.hash(order);
        let state = book.fill_state(&hash);
        if state.canceled {
            return Err(Error::OrderCanceled);
        }
        let remaining = state.remaining(order);
        if remaining.is_zero() {
            return Err(Error::AlreadyFilled);
        }
        request.signature.verify(&hash, order.maker)?;
        if !order.accepts_path(&request.path) {
            return Err(Error::InvalidPath);
        }
        if order.is_expired(tx.timestamp) {
            return Err(Error::OrderExpired);
        }
        if request.amount_to_fill_in.is_zero() {
            return Err(Error::InvalidFillAmount);
        }
        let amount = request.amount_to_fill_in.min(remaining);

        let checkpoint = env.checkpoint();
        match self.execute(book, env, tx, request, amount) {
            Ok(receipt) => {
                env.commit(checkpoint);
                book.record_fill_event(receipt.hash, receipt.amount_in, receipt.amount_out);
                info!(
                    hash = %receipt.hash,
                    relayer = %receipt.relayer,
                    amount_in = %receipt.amount_in,
                    amount_out = %receipt.amount_out,
                    fee = %receipt.fee,
                    fully_filled = receipt.fully_filled,
                    "order filled"
                );
                Ok(receipt)
            }
            Err(err) => {
                env.revert_to(checkpoint);
                debug!(hash = %hash, error = %err, "fill rolled back");
                Err(err)
            }
        }
    }

    fn execute<E: Environment>(
        &self,
        book: &mut OrderBook,
        env: &mut E,
        tx: &TxContext,
        request: &FillRequest,
        amount: U256,
    ) -> Result<FillReceipt> {
        let order = &request.order;
        let hash = book.hash(order);

        env.transfer_from(order.source_token, self.address, order.maker, self.address, amount)?;

        let fee = self.fees.fee_of(amount)?;
        let swap_amount = amount.checked_sub(fee).ok_or(Error::Overflow)?;
        let amount_out = self.swap(env, swap_amount, &request.path, order.recipient, tx.timestamp)?;

        if !meets_min_out(amount_out, amount, order.min_amount_out, order.amount_in)? {
            return Err(Error::InsufficientAmountOut {
                expected: pro_rata_min_out(order.min_amount_out, amount, order.amount_in)?,
                actual: amount_out,
            });
        }

        let fee_split = self.fees.split_of(fee)?;
        let mut fee_split_out = U256::ZERO;
        if let Some(recipient) = self.fees.fee_split_recipient {
            if !fee_split.is_zero() {
                fee_split_out = match self.fees.fee_token {
                    Some(fee_token) if fee_token != order.source_token => self.swap(
                        env,
                        fee_split,
                        &[order.source_token, fee_token],
                        recipient,
                        tx.timestamp,
                    )?,
                    _ => {
                        env.transfer(order.source_token, self.address, recipient, fee_split)?;
                        fee_split
                    }
                };
            }
        }

        let relayer_fee = fee.checked_sub(fee_split).ok_or(Error::Overflow)?;
        if !relayer_fee.is_zero() {
            env.transfer(order.source_token, self.address, tx.sender, relayer_fee)?;
        }

        let state = book.apply_fill(hash, order, amount)?;
        Ok(FillReceipt {
            hash,
            relayer: tx.sender,
            amount_in: amount,
            amount_out,
            fee,
            fee_split,
            fee_split_out,
            filled_amount_in: state.filled_amount_in,
            fully_filled: state.is_fully_filled(order),
        })
    }

    /// Approve the router and swap `amount_in` held by this engine along
    /// `path`, paying the output to `to`
    fn swap<E: Environment>(
        &self,
        env: &mut E,
        amount_in: U256,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<U256> {
        let token_in = path.first().copied().ok_or(Error::InvalidPath)?;
        let router = env.router_address();
        env.approve(token_in, self.address, router, amount_in)?;
        let amounts =
            env.swap_exact_tokens_for_tokens(self.address, amount_in, U256::ZERO, path, to, deadline)?;
        amounts
            .last()
            .copied()
            .ok_or(Error::SwapFailed(RouterError::InvalidPath))
    }

    /// Fill every request independently
    ///
    /// A failing request is skipped and its error kept in the receipt at the
    /// request's position; it leaves no trace in `book` or `env`.
    ///
    /// # Errors
    ///
    /// `NoOrderFilled` if no request was filled.
    pub fn fill_orders<E: Environment>(
        &self,
        book: &mut OrderBook,
        env: &mut E,
        tx: &TxContext,
        requests: &[FillRequest],
    ) -> Result<BatchReceipt> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            let outcome = self.fill_order(book, env, tx, request);
            if let Err(err) = &outcome {
                warn!(index, error = %err, "fill skipped");
            }
            outcomes.push(outcome);
        }

        let receipt = BatchReceipt::new(outcomes, book.state_root());
        if receipt.fills_executed() == 0 {
            return Err(Error::NoOrderFilled);
        }
        info!(
            requests = receipt.requests_processed(),
            filled = receipt.fills_executed(),
            "batch settled"
        );
        Ok(receipt)
    }

    /// Output the pool currently quotes for filling `request`, after fees
    ///
    /// Returns zero when nothing of the order remains.
    pub fn quote_fill<R: SwapRouter>(
        &self,
        book: &OrderBook,
        router: &R,
        request: &FillRequest,
    ) -> Result<U256> {
        let remaining = book
            .fill_state(&book.hash(&request.order))
            .remaining(&request.order);
        let amount = request.amount_to_fill_in.min(remaining);
        if amount.is_zero() {
            return Ok(U256::ZERO);
        }
        let fee = self.fees.fee_of(amount)?;
        let amounts = router.get_amounts_out(amount - fee, &request.path)?;
        Ok(amounts.last().copied().unwrap_or(U256::ZERO))
    }

    // ========================================================================
    // Fee Administration
    // ========================================================================

    fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    /// Set the fee numerator; the denominator is fixed at deployment
    pub fn update_fee(&mut self, caller: Address, fee_numerator: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        check_fee(fee_numerator, self.fees.fee_denominator)?;

        self.fees.fee_numerator = fee_numerator;
        info!(fee_numerator, fee_denominator = self.fees.fee_denominator, "fee updated");
        self.events.push(Event::FeeUpdated { fee_numerator });
        Ok(())
    }

    /// Set the share of each fee routed to the fee-split recipient, out of
    /// 10000
    pub fn update_fee_split(&mut self, caller: Address, fee_split_numerator: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        check_fee_split(fee_split_numerator)?;

        self.fees.fee_split_numerator = fee_split_numerator;
        info!(fee_split_numerator, "fee split updated");
        self.events.push(Event::FeeSplitUpdated {
            fee_split_numerator,
        });
        Ok(())
    }

    /// Set or clear the fee-split recipient
    pub fn update_fee_split_recipient(
        &mut self,
        caller: Address,
        recipient: Option<Address>,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        if recipient == Some(Address::ZERO) {
            return Err(Error::InvalidRecipient);
        }

        self.fees.fee_split_recipient = recipient;
        info!(recipient = ?recipient, "fee split recipient updated");
        self.events.push(Event::FeeSplitRecipientUpdated { recipient });
        Ok(())
    }

    /// Pending administrative events, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain pending administrative events
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
