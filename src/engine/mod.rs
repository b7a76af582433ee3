//! Settlement engine module.
//!
//! ## Design Principles
//!
//! The settlement engine is designed for:
//!
//! 1. **Atomicity**: A fill either completes or leaves no trace
//! 2. **Integer Math**: All amounts are `U256`, rounded down
//! 3. **Synchronous Execution**: Every external call completes in place
//! 4. **Maker Protection**: The signed price bound holds for every fill
//!
//! ## Fill Rules
//!
//! - Orders fill against the external pool, never against each other
//! - **Partial fills** are supported and capped at the remaining amount
//! - **Fully filled** orders leave the live indices
//! - **Batches** settle whatever is currently fillable
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::Address;
//! use limit_orderbook::engine::{FeeConfig, Settlement};
//!
//! let owner = Address::repeat_byte(1);
//! let mut settlement = Settlement::new(Address::repeat_byte(2), owner, FeeConfig::default()).unwrap();
//!
//! settlement.update_fee(owner, 3).unwrap();
//! assert_eq!(settlement.fees().fee_numerator, 3);
//! ```

pub mod fees;
pub mod settlement;

pub use fees::{FeeConfig, MAX_FEE_SPLIT_NUMERATOR};
pub use settlement::Settlement;
