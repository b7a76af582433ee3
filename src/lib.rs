//! # Limit Orderbook
//!
//! Signed limit order registry and settlement engine.
//!
//! ## Architecture
//!
//! Makers sign orders off-chain; anyone can register them and later fill
//! them against an external AMM once the pool price satisfies the maker's
//! minimum output. The crate consists of:
//! - **Types**: Core data structures (Order, OrderSignature, Domain, receipts)
//! - **Registry**: Four linked-list indices over order hashes, slab-backed
//! - **OrderBook**: Order records, live and canceled indices, fill states
//! - **Engine**: Fill execution, fee split and fee administration
//! - **Env**: Traits for the token ledger, swap router and journal
//! - **Sim**: In-memory implementation of the environment
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical operation sequences give identical state roots
//! 2. **No Floating Point**: Amounts are `U256` base units, decimals via `rust_decimal`
//! 3. **Pre-allocated Memory**: Slab allocation for O(1) index operations
//! 4. **Atomic Fills**: A failed fill reverts every external effect
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::Address;
//! use limit_orderbook::{Config, OrderBook};
//!
//! let config = Config::new(
//!     31337,
//!     Address::repeat_byte(0xbb),
//!     Address::repeat_byte(0x5e),
//!     Address::repeat_byte(0x01),
//! );
//! let book: OrderBook = config.order_book();
//! let settlement = config.settlement().unwrap();
//!
//! assert_eq!(book.number_of_all_hashes(), 0);
//! assert_eq!(settlement.fees().fee_numerator, 2);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, OrderSignature, Domain, fills and receipts
pub mod types;

/// Indexed registry: slab-backed linked lists of order hashes
pub mod registry;

/// Order book: records, indices and fill states
pub mod orderbook;

/// Settlement engine: fills, fees and batches
pub mod engine;

/// External collaborators: ledger, router and journal traits
pub mod env;

/// In-memory chain implementing the environment traits
pub mod sim;

pub mod config;
pub mod error;
pub mod events;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{Config, ConfigError};
pub use engine::{FeeConfig, Settlement};
pub use env::{Environment, TxContext};
pub use error::{Error, ErrorKind, Result};
pub use events::Event;
pub use orderbook::OrderBook;
pub use registry::{IndexId, OrderIndices};
pub use types::{
    BatchReceipt, Domain, FillReceipt, FillRequest, FillState, Order, OrderSignature,
};
