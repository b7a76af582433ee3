//! Order book module.
//!
//! ## Architecture
//!
//! The order book is a registry of maker-signed orders on top of the
//! indexed registry in [`crate::registry`]:
//!
//! - **Live indices**: O(1) insertion and removal by hash
//! - **Canceled indices**: same layout, for orders canceled by their maker
//! - **Fill states**: replay protection for filled and canceled hashes
//!
//! Fills are executed by [`crate::engine::Settlement`], which is the only
//! writer of fill states besides cancellation.
//!
//! ## Components
//!
//! - [`OrderBook`]: Records, indices, fill states and pending events
//! - [`OrderRecord`]: An order with the signature it was created with
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Create order | O(1) |
//! | Cancel order | O(1) |
//! | Apply fill | O(log n) |
//! | Page | O(offset + count) |
//! | Count | O(1) |

pub mod book;

pub use book::{OrderBook, OrderRecord};
