//! Observations emitted by the order book and the settlement engine.
//!
//! Events are append-only. Nothing in the crate consumes them; callers
//! drain them with `take_events` and forward them to whatever indexes them.

use alloy_primitives::{Address, B256, U256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    OrderCreated {
        hash: B256,
        maker: Address,
        source_token: Address,
        destination_token: Address,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
        deadline: u64,
    },

    OrderCanceled {
        hash: B256,
    },

    /// One fill of `amount_in` source tokens that paid out `amount_out`
    OrderFilled {
        hash: B256,
        amount_in: U256,
        amount_out: U256,
    },

    FeeUpdated {
        fee_numerator: u64,
    },

    FeeSplitUpdated {
        fee_split_numerator: u64,
    },

    FeeSplitRecipientUpdated {
        recipient: Option<Address>,
    },
}

impl Event {
    /// Order hash the event refers to, if any
    pub fn order_hash(&self) -> Option<B256> {
        match self {
            Event::OrderCreated { hash, .. }
            | Event::OrderCanceled { hash }
            | Event::OrderFilled { hash, .. } => Some(*hash),
            _ => None,
        }
    }
}
