//! Fill requests, per-order fill state and fill receipts.
//!
//! ## Terminology
//!
//! - **Maker**: the account whose signed order is being filled
//! - **Relayer**: the account that submits the fill and earns the fee
//!
//! A fill always trades the maker against the external pool; there is no
//! counter-order.

use alloy_primitives::{Address, B256, U256};
use rust_decimal::Decimal;

use crate::types::amount;
use crate::types::{Order, OrderSignature};

/// A relayer's request to fill (part of) an order along a swap path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRequest {
    pub order: Order,

    /// Maker signature over the order hash
    pub signature: OrderSignature,

    /// Amount of the source token to fill; capped at what remains
    pub amount_to_fill_in: U256,

    /// Token path from source to destination token
    pub path: Vec<Address>,
}

impl FillRequest {
    pub fn new(
        order: Order,
        signature: OrderSignature,
        amount_to_fill_in: U256,
        path: Vec<Address>,
    ) -> Self {
        Self {
            order,
            signature,
            amount_to_fill_in,
            path,
        }
    }

    /// Fill the whole order through the direct source/destination pool
    pub fn full(order: Order, signature: OrderSignature) -> Self {
        let path = vec![order.source_token, order.destination_token];
        Self::new(order, signature, order.amount_in, path)
    }
}

/// Settlement progress of one order hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillState {
    /// Cumulative filled amount of the source token
    pub filled_amount_in: U256,

    /// Set once by cancellation, never cleared
    pub canceled: bool,
}

impl FillState {
    /// Amount of `order` still fillable
    pub fn remaining(&self, order: &Order) -> U256 {
        order.amount_in.saturating_sub(self.filled_amount_in)
    }

    pub fn is_fully_filled(&self, order: &Order) -> bool {
        self.filled_amount_in >= order.amount_in
    }
}

/// Outcome of one successful fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillReceipt {
    /// Order hash
    pub hash: B256,

    /// Relayer that submitted the fill
    pub relayer: Address,

    /// Source token pulled from the maker by this fill
    pub amount_in: U256,

    /// Destination token delivered to the recipient
    pub amount_out: U256,

    /// Relayer fee in the source token, before the split
    pub fee: U256,

    /// Share of `fee` routed to the fee-split recipient
    pub fee_split: U256,

    /// Fee-token amount the split converted into
    pub fee_split_out: U256,

    /// Cumulative filled amount after this fill
    pub filled_amount_in: U256,

    /// True if this fill completed the order
    pub fully_filled: bool,
}

impl FillReceipt {
    /// Fee kept by the relayer
    pub fn relayer_fee(&self) -> U256 {
        self.fee.saturating_sub(self.fee_split)
    }

    /// Destination units received per source unit pulled
    pub fn execution_price(&self) -> Option<Decimal> {
        amount::execution_price(self.amount_in, self.amount_out)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
