//! Index node for slab-based storage.
//!
//! ## Design
//!
//! `IndexNode` wraps an order hash with doubly-linked list pointers for
//! efficient removal from a hash list. This allows O(1) removal when
//! we have the slab key.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! ## Linked List
//!
//! Hashes sharing an index key form a doubly-linked list:
//! - `next`: Points to the next hash (newer) in the list
//! - `prev`: Points to the previous hash (older) in the list
//!
//! The links are scoped to one index. The same order hash lives in a
//! separate node in every index it belongs to.

use alloy_primitives::B256;

/// Index node stored in the slab.
///
/// Contains the order hash, the index key it is filed under, and the
/// linked-list pointers. The pointers are slab keys (`usize`), not
/// direct references.
#[derive(Debug, Clone)]
pub struct IndexNode<K> {
    /// The order hash this node represents
    pub hash: B256,

    /// The index key whose list this node belongs to
    pub key: K,

    /// Next hash in the list (slab key)
    /// None if this is the tail (newest entry)
    pub next: Option<usize>,

    /// Previous hash in the list (slab key)
    /// None if this is the head (oldest entry)
    pub prev: Option<usize>,
}

impl<K> IndexNode<K> {
    /// Create a new index node (not yet linked)
    ///
    /// # Example
    ///
    /// ```
    /// use alloy_primitives::B256;
    /// use limit_orderbook::registry::IndexNode;
    ///
    /// let node = IndexNode::new(B256::repeat_byte(1), ());
    ///
    /// assert!(node.next.is_none());
    /// assert!(node.prev.is_none());
    /// ```
    #[inline]
    pub fn new(hash: B256, key: K) -> Self {
        Self {
            hash,
            key,
            next: None,
            prev: None,
        }
    }

    /// Check if this node is unlinked (no neighbours in its list)
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
