//! Enumerable hash index keyed by an order attribute.
//!
//! ## Architecture
//!
//! - **Slab**: Node storage for O(1) link operations
//! - **HashMap<K, HashList>**: One insertion-ordered list per key value
//! - **HashMap<B256, usize>**: Order hash to slab key mapping for O(1) removal
//!
//! A hash is filed under at most one key per index (an order has one
//! maker, one source token and one destination token).

use std::collections::HashMap;
use std::hash::Hash;

use alloy_primitives::B256;
use slab::Slab;

use crate::registry::list::ListKeys;
use crate::registry::{HashList, IndexNode, RegistryError};

/// An enumerable set of order hashes partitioned by key.
#[derive(Debug, Clone)]
pub struct HashIndex<K> {
    /// Node storage shared by all lists of this index
    nodes: Slab<IndexNode<K>>,

    /// Order hash to slab key mapping
    slots: HashMap<B256, usize>,

    /// List metadata per key value
    lists: HashMap<K, HashList>,
}

impl<K: Copy + Eq + Hash> Default for HashIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> HashIndex<K> {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            slots: HashMap::new(),
            lists: HashMap::new(),
        }
    }

    /// Create an index with pre-allocated node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            lists: HashMap::new(),
        }
    }

    /// Total number of hashes across all keys
    #[inline]
    pub fn total(&self) -> usize {
        self.nodes.len()
    }

    /// Number of hashes filed under `key`
    #[inline]
    pub fn len(&self, key: &K) -> usize {
        self.lists.get(key).map_or(0, |list| list.len)
    }

    /// Check if the hash is present under any key
    #[inline]
    pub fn contains(&self, hash: &B256) -> bool {
        self.slots.contains_key(hash)
    }

    /// Check if the hash is present under `key`
    pub fn contains_under(&self, key: &K, hash: &B256) -> bool {
        self.slots
            .get(hash)
            .and_then(|slot| self.nodes.get(*slot))
            .is_some_and(|node| node.key == *key)
    }

    /// Append `hash` to the list of `key`
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` if the hash is already in this index.
    pub fn insert(&mut self, key: K, hash: B256) -> Result<(), RegistryError> {
        if self.slots.contains_key(&hash) {
            return Err(RegistryError::DuplicateEntry);
        }

        let slot = self.nodes.insert(IndexNode::new(hash, key));
        let list = self.lists.entry(key).or_default();
        if let Err(err) = list.push_back(slot, &mut self.nodes) {
            self.nodes.remove(slot);
            return Err(err);
        }
        self.slots.insert(hash, slot);
        Ok(())
    }

    /// Unlink `hash` from the list of `key`
    ///
    /// # Errors
    ///
    /// `NotFound` if the hash is not filed under `key`.
    pub fn remove(&mut self, key: &K, hash: &B256) -> Result<(), RegistryError> {
        if !self.contains_under(key, hash) {
            return Err(RegistryError::NotFound);
        }
        let slot = self.slots[hash];
        let list = self.lists.get_mut(key).ok_or(RegistryError::NotFound)?;
        list.unlink(slot, &mut self.nodes)?;

        // Drop empty lists so key churn does not grow the map
        if list.is_empty() {
            self.lists.remove(key);
        }

        self.slots.remove(hash);
        self.nodes.remove(slot);
        Ok(())
    }

    /// Return up to `count` hashes of `key`, starting at the `offset`-th
    /// entry in insertion order.
    ///
    /// The result is exactly as long as what exists: a short or empty
    /// vector when the list ends before `offset + count`.
    pub fn page(&self, key: &K, offset: usize, count: usize) -> Vec<B256> {
        self.iter(key).skip(offset).take(count).collect()
    }

    /// Return up to `count` hashes of `key` that follow `after` in
    /// insertion order, or the first `count` when `after` is `None`.
    ///
    /// Resumes from the cursor's node, so the cost does not depend on how
    /// deep into the list the page starts.
    ///
    /// # Errors
    ///
    /// `NotFound` if `after` is not filed under `key`.
    pub fn page_after(
        &self,
        key: &K,
        after: Option<&B256>,
        count: usize,
    ) -> Result<Vec<B256>, RegistryError> {
        let start = match after {
            None => self.lists.get(key).and_then(|list| list.head),
            Some(hash) => {
                if !self.contains_under(key, hash) {
                    return Err(RegistryError::NotFound);
                }
                self.nodes[self.slots[hash]].next
            }
        };
        Ok(ListKeys::from_head(&self.nodes, start)
            .take(count)
            .map(|slot| self.nodes[slot].hash)
            .collect())
    }

    /// Iterate over the hashes of `key` in insertion order
    pub fn iter(&self, key: &K) -> impl Iterator<Item = B256> + '_ {
        let head = self.lists.get(key).and_then(|list| list.head);
        ListKeys::from_head(&self.nodes, head).map(move |slot| self.nodes[slot].hash)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.slots.clear();
        self.lists.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
