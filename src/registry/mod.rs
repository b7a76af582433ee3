//! Indexed order registry.
//!
//! ## Architecture
//!
//! The registry is a multi-key enumerable set of 32-byte order hashes:
//!
//! - **Global index**: every hash, in insertion order
//! - **Maker index**: hashes partitioned by maker account
//! - **Source token index**: hashes partitioned by the token sold
//! - **Destination token index**: hashes partitioned by the token bought
//!
//! Each index owns its own slab of link nodes, so removing a hash from one
//! index never touches the links of another.
//!
//! ## Components
//!
//! - [`IndexNode`]: Order hash with linked-list pointers
//! - [`HashList`]: Insertion-ordered list for a single key value
//! - [`HashIndex`]: All lists of one index, with hash-to-node lookup
//! - [`OrderIndices`]: The four indices updated together
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert | O(1) |
//! | Remove by hash | O(1) |
//! | Size | O(1) |
//! | Page by offset | O(offset + count) |
//! | Page after cursor | O(count) |
//!
//! Offset paging walks from the head of the list. Callers that enumerate a
//! long list should page with the last hash of the previous page as cursor.
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, B256};
//! use limit_orderbook::registry::{IndexId, IndexKeys, OrderIndices};
//!
//! let keys = IndexKeys {
//!     maker: Address::repeat_byte(1),
//!     source_token: Address::repeat_byte(2),
//!     destination_token: Address::repeat_byte(3),
//! };
//! let mut indices = OrderIndices::new();
//! indices.insert(&keys, B256::repeat_byte(9)).unwrap();
//!
//! assert_eq!(indices.size(&IndexId::Maker(keys.maker)), 1);
//! assert_eq!(indices.page(&IndexId::All, 0, 10), vec![B256::repeat_byte(9)]);
//! ```

pub mod node;
pub mod list;
pub mod index;

pub use node::IndexNode;
pub use list::HashList;
pub use index::HashIndex;

use alloy_primitives::{Address, B256};
use thiserror::Error;

/// Registry failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The hash is already present in the global index
    #[error("hash already registered")]
    DuplicateEntry,

    /// The hash is absent from an index it was expected in
    #[error("hash not found in index")]
    NotFound,
}

/// Selects one list of one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexId {
    /// Every registered hash
    All,
    /// Hashes of one maker
    Maker(Address),
    /// Hashes selling one token
    SourceToken(Address),
    /// Hashes buying one token
    DestinationToken(Address),
}

/// The attribute values an order hash is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexKeys {
    pub maker: Address,
    pub source_token: Address,
    pub destination_token: Address,
}

/// Global, maker, source-token and destination-token indices over the
/// same set of hashes.
#[derive(Debug, Clone, Default)]
pub struct OrderIndices {
    all: HashIndex<()>,
    by_maker: HashIndex<Address>,
    by_source_token: HashIndex<Address>,
    by_destination_token: HashIndex<Address>,
}

impl OrderIndices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create indices with pre-allocated node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            all: HashIndex::with_capacity(capacity),
            by_maker: HashIndex::with_capacity(capacity),
            by_source_token: HashIndex::with_capacity(capacity),
            by_destination_token: HashIndex::with_capacity(capacity),
        }
    }

    /// Check if the hash is registered
    #[inline]
    pub fn contains(&self, hash: &B256) -> bool {
        self.all.contains(hash)
    }

    /// Append `hash` to all four indices.
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` if the hash is already registered; nothing is
    /// modified in that case.
    pub fn insert(&mut self, keys: &IndexKeys, hash: B256) -> Result<(), RegistryError> {
        if self.all.contains(&hash)
            || self.by_maker.contains(&hash)
            || self.by_source_token.contains(&hash)
            || self.by_destination_token.contains(&hash)
        {
            return Err(RegistryError::DuplicateEntry);
        }

        self.all.insert((), hash)?;
        self.by_maker.insert(keys.maker, hash)?;
        self.by_source_token.insert(keys.source_token, hash)?;
        self.by_destination_token.insert(keys.destination_token, hash)?;
        Ok(())
    }

    /// Unlink `hash` from all four indices.
    ///
    /// # Errors
    ///
    /// `NotFound` if any index does not hold the hash under the given key;
    /// nothing is modified in that case.
    pub fn remove(&mut self, keys: &IndexKeys, hash: &B256) -> Result<(), RegistryError> {
        if !(self.all.contains_under(&(), hash)
            && self.by_maker.contains_under(&keys.maker, hash)
            && self.by_source_token.contains_under(&keys.source_token, hash)
            && self.by_destination_token.contains_under(&keys.destination_token, hash))
        {
            return Err(RegistryError::NotFound);
        }

        self.all.remove(&(), hash)?;
        self.by_maker.remove(&keys.maker, hash)?;
        self.by_source_token.remove(&keys.source_token, hash)?;
        self.by_destination_token.remove(&keys.destination_token, hash)?;
        Ok(())
    }

    /// Up to `count` hashes of the selected list starting at `offset`.
    ///
    /// The result is exact-length: it never contains padding entries.
    pub fn page(&self, id: &IndexId, offset: usize, count: usize) -> Vec<B256> {
        match id {
            IndexId::All => self.all.page(&(), offset, count),
            IndexId::Maker(maker) => self.by_maker.page(maker, offset, count),
            IndexId::SourceToken(token) => self.by_source_token.page(token, offset, count),
            IndexId::DestinationToken(token) => {
                self.by_destination_token.page(token, offset, count)
            }
        }
    }

    /// Up to `count` hashes of the selected list that follow `after`.
    ///
    /// # Errors
    ///
    /// `NotFound` if `after` is not in the selected list.
    pub fn page_after(
        &self,
        id: &IndexId,
        after: Option<&B256>,
        count: usize,
    ) -> Result<Vec<B256>, RegistryError> {
        match id {
            IndexId::All => self.all.page_after(&(), after, count),
            IndexId::Maker(maker) => self.by_maker.page_after(maker, after, count),
            IndexId::SourceToken(token) => self.by_source_token.page_after(token, after, count),
            IndexId::DestinationToken(token) => {
                self.by_destination_token.page_after(token, after, count)
            }
        }
    }

    /// Exact number of hashes in the selected list
    pub fn size(&self, id: &IndexId) -> usize {
        match id {
            IndexId::All => self.all.len(&()),
            IndexId::Maker(maker) => self.by_maker.len(maker),
            IndexId::SourceToken(token) => self.by_source_token.len(token),
            IndexId::DestinationToken(token) => self.by_destination_token.len(token),
        }
    }

    /// Iterate over every registered hash in insertion order
    pub fn iter(&self) -> impl Iterator<Item = B256> + '_ {
        self.all.iter(&())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(maker: u8, source: u8, destination: u8) -> IndexKeys {
        IndexKeys {
            maker: Address::repeat_byte(maker),
            source_token: Address::repeat_byte(source),
            destination_token: Address::repeat_byte(destination),
        }
    }

    fn hash(n: u8) -> B256 {
        B256::repeat_byte(n)
    }

    #[test]
    fn test_insert_files_under_every_index() {
        let k = keys(1, 2, 3);
        let mut indices = OrderIndices::with_capacity(4);
        indices.insert(&k, hash(7)).unwrap();

        for id in [
            IndexId::All,
            IndexId::Maker(k.maker),
            IndexId::SourceToken(k.source_token),
            IndexId::DestinationToken(k.destination_token),
        ] {
            assert_eq!(indices.size(&id), 1, "{:?}", id);
            assert_eq!(indices.page(&id, 0, 1), vec![hash(7)], "{:?}", id);
        }
        assert!(indices.contains(&hash(7)));
    }

    #[test]
    fn test_insert_duplicate_is_rejected() {
        let mut indices = OrderIndices::new();
        indices.insert(&keys(1, 2, 3), hash(7)).unwrap();

        let err = indices.insert(&keys(4, 5, 6), hash(7)).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateEntry);
        assert_eq!(indices.size(&IndexId::Maker(Address::repeat_byte(4))), 0);
    }

    #[test]
    fn test_remove_with_wrong_keys_changes_nothing() {
        let k = keys(1, 2, 3);
        let mut indices = OrderIndices::new();
        indices.insert(&k, hash(7)).unwrap();

        let err = indices.remove(&keys(1, 2, 9), &hash(7)).unwrap_err();
        assert_eq!(err, RegistryError::NotFound);
        assert_eq!(indices.size(&IndexId::All), 1);
        assert_eq!(indices.size(&IndexId::Maker(k.maker)), 1);
    }

    #[test]
    fn test_remove_keeps_other_partitions() {
        let a = keys(1, 2, 3);
        let b = keys(4, 2, 3);
        let mut indices = OrderIndices::new();
        indices.insert(&a, hash(1)).unwrap();
        indices.insert(&b, hash(2)).unwrap();
        indices.insert(&a, hash(3)).unwrap();

        indices.remove(&a, &hash(1)).unwrap();

        assert_eq!(indices.page(&IndexId::All, 0, 10), vec![hash(2), hash(3)]);
        assert_eq!(indices.page(&IndexId::Maker(a.maker), 0, 10), vec![hash(3)]);
        assert_eq!(indices.page(&IndexId::Maker(b.maker), 0, 10), vec![hash(2)]);
        assert_eq!(indices.size(&IndexId::SourceToken(a.source_token)), 2);
    }

    #[test]
    fn test_page_after_walks_each_partition() {
        let a = keys(1, 2, 3);
        let b = keys(4, 2, 5);
        let mut indices = OrderIndices::new();
        for n in 1..=6 {
            indices.insert(if n <= 3 { &a } else { &b }, hash(n)).unwrap();
        }

        let source = IndexId::SourceToken(a.source_token);
        let first = indices.page_after(&source, None, 4).unwrap();
        let rest = indices.page_after(&source, first.last(), 4).unwrap();
        assert_eq!(first, (1..=4).map(hash).collect::<Vec<_>>());
        assert_eq!(rest, vec![hash(5), hash(6)]);

        assert_eq!(
            indices.page_after(&IndexId::Maker(b.maker), Some(&hash(4)), 10),
            Ok(vec![hash(5), hash(6)])
        );
        assert_eq!(
            indices.page_after(&IndexId::DestinationToken(a.destination_token), Some(&hash(4)), 10),
            Err(RegistryError::NotFound)
        );
    }

    #[test]
    fn test_remove_missing() {
        let mut indices = OrderIndices::new();
        assert_eq!(
            indices.remove(&keys(1, 2, 3), &hash(1)),
            Err(RegistryError::NotFound)
        );
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let mut indices = OrderIndices::new();
        for n in [5u8, 3, 9] {
            indices.insert(&keys(1, 2, 3), hash(n)).unwrap();
        }

        let all: Vec<_> = indices.iter().collect();
        assert_eq!(all, vec![hash(5), hash(3), hash(9)]);
    }
}
