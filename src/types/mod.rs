//! Core data types for the order book
//!
//! All amounts are raw token base units (`U256`); no floating point is used.
//! Accounts and tokens are 20-byte addresses, order hashes 32-byte words.
//!
//! ## Types
//!
//! - [`Order`]: A maker's signed limit order
//! - [`OrderSignature`]: ECDSA `(v, r, s)` over an order or cancel digest
//! - [`Domain`]: Structured-hash domain of one registry deployment
//! - [`FillRequest`]: A relayer's request to fill an order along a path
//! - [`FillState`]: Cumulative fill amount and cancel flag of one hash
//! - [`FillReceipt`]: Outcome of one fill
//! - [`BatchReceipt`]: Outcomes of a fill batch

mod order;
mod domain;
mod signature;
mod fill;
mod receipt;
pub mod amount;

pub use order::Order;
pub use domain::{
    domain_separator, order_struct_hash, typed_data_hash, Domain, CANCEL_TYPE, DEFAULT_NAME,
    DEFAULT_VERSION, DOMAIN_TYPE, ORDER_TYPE,
};
pub use signature::OrderSignature;
pub use fill::{FillReceipt, FillRequest, FillState};
pub use receipt::BatchReceipt;
