//! Insertion-ordered hash list for one index key.
//!
//! ## Design
//!
//! A `HashList` represents every hash filed under a single index key
//! (one maker, one token, or the global list). Hashes are maintained in
//! a doubly-linked list in insertion order.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> hash2 <-> hash3 <-> tail (newest)
//! ```
//!
//! - New hashes are appended at the tail
//! - Traversal walks from the head
//! - Any hash can be removed in O(1) using the slab key

use slab::Slab;

use crate::registry::{IndexNode, RegistryError};

/// A list of hashes under a single index key.
///
/// The node data lives in the slab; this struct only holds the list
/// metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashList {
    /// Head of the list (oldest entry, slab key)
    pub head: Option<usize>,

    /// Tail of the list (newest entry, slab key)
    /// New entries are appended here
    pub tail: Option<usize>,

    /// Number of hashes in the list
    pub len: usize,
}

impl HashList {
    /// Create a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a node to the tail of the list
    ///
    /// # Arguments
    ///
    /// * `key` - The slab key for the node
    /// * `slab` - The slab containing all nodes of this index
    pub fn push_back<K>(
        &mut self,
        key: usize,
        slab: &mut Slab<IndexNode<K>>,
    ) -> Result<(), RegistryError> {
        let old_tail = self.tail;
        let node = slab.get_mut(key).ok_or(RegistryError::NotFound)?;
        node.prev = old_tail;
        node.next = None;

        if let Some(tail_key) = old_tail {
            // Link the old tail to the new node
            let tail_node = slab.get_mut(tail_key).ok_or(RegistryError::NotFound)?;
            tail_node.next = Some(key);
        } else {
            // Empty list - this is also the head
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.len += 1;
        Ok(())
    }

    /// Unlink a node from the list by slab key
    ///
    /// Only the removed node's own links are consulted, so the splice is
    /// O(1) regardless of position. The node stays in the slab; the caller
    /// frees it.
    pub fn unlink<K>(
        &mut self,
        key: usize,
        slab: &mut Slab<IndexNode<K>>,
    ) -> Result<(), RegistryError> {
        let node = slab.get(key).ok_or(RegistryError::NotFound)?;
        let prev_key = node.prev;
        let next_key = node.next;

        // Update the previous node's next pointer
        if let Some(prev) = prev_key {
            let prev_node = slab.get_mut(prev).ok_or(RegistryError::NotFound)?;
            prev_node.next = next_key;
        } else {
            // This was the head
            self.head = next_key;
        }

        // Update the next node's prev pointer
        if let Some(next) = next_key {
            let next_node = slab.get_mut(next).ok_or(RegistryError::NotFound)?;
            next_node.prev = prev_key;
        } else {
            // This was the tail
            self.tail = prev_key;
        }

        if let Some(node) = slab.get_mut(key) {
            node.prev = None;
            node.next = None;
        }

        self.len -= 1;
        Ok(())
    }

    /// Iterate over the slab keys of this list from head to tail
    pub fn keys<'a, K>(&self, slab: &'a Slab<IndexNode<K>>) -> ListKeys<'a, K> {
        ListKeys::from_head(slab, self.head)
    }
}

/// Forward iterator over the slab keys of a [`HashList`].
pub struct ListKeys<'a, K> {
    slab: &'a Slab<IndexNode<K>>,
    cursor: Option<usize>,
}

impl<'a, K> ListKeys<'a, K> {
    pub(crate) fn from_head(slab: &'a Slab<IndexNode<K>>, head: Option<usize>) -> Self {
        Self { slab, cursor: head }
    }
}

impl<K> Iterator for ListKeys<'_, K> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let key = self.cursor?;
        self.cursor = self.slab.get(key).and_then(|node| node.next);
        Some(key)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
