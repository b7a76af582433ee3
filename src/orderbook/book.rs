//! Signed order registry.
//!
//! ## Architecture
//!
//! The book keeps every order it has ever accepted and tracks where each
//! one is in its lifecycle:
//!
//! - **Records**: order hash to the order and its maker signature
//! - **Live indices**: hashes that can still be filled
//! - **Canceled indices**: hashes canceled by their maker
//! - **Fill states**: cumulative filled amount and cancel flag per hash
//!
//! Records are never deleted. A fully filled or canceled order leaves the
//! live indices but keeps its record and fill state, which is what rejects
//! replays.
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use limit_orderbook::orderbook::OrderBook;
//! use limit_orderbook::types::Domain;
//!
//! let book = OrderBook::new(Domain::with_defaults(1, Address::repeat_byte(0xbb)));
//!
//! assert_eq!(book.number_of_all_hashes(), 0);
//! assert!(book.all_hashes(0, 10).is_empty());
//! ```

use std::collections::{BTreeMap, HashMap};

use alloy_primitives::{Address, B256, U256};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::events::Event;
use crate::registry::{IndexId, OrderIndices};
use crate::types::{Domain, FillState, Order, OrderSignature};

/// A stored order and the signature it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRecord {
    pub order: Order,
    pub signature: OrderSignature,
}

/// Order registry of one deployment.
#[derive(Debug)]
pub struct OrderBook {
    /// Signing domain every hash is computed under
    domain: Domain,

    /// Order hash to record, kept after cancel and full fill
    records: HashMap<B256, OrderRecord>,

    /// Fillable hashes
    live: OrderIndices,

    /// Canceled hashes
    canceled: OrderIndices,

    /// Fill progress, ordered by hash for a deterministic state root
    fill_states: BTreeMap<B256, FillState>,

    /// Pending observations
    events: Vec<Event>,
}

impl OrderBook {
    /// Create an empty book for `domain`
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            records: HashMap::new(),
            live: OrderIndices::new(),
            canceled: OrderIndices::new(),
            fill_states: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Create a book with pre-allocated room for `capacity` orders
    ///
    /// # Example
    ///
    /// ```
    /// use alloy_primitives::Address;
    /// use limit_orderbook::orderbook::OrderBook;
    /// use limit_orderbook::types::Domain;
    ///
    /// let book = OrderBook::with_capacity(Domain::with_defaults(1, Address::ZERO), 10_000);
    /// assert_eq!(book.number_of_all_hashes(), 0);
    /// ```
    pub fn with_capacity(domain: Domain, capacity: usize) -> Self {
        Self {
            domain,
            records: HashMap::with_capacity(capacity),
            live: OrderIndices::with_capacity(capacity),
            canceled: OrderIndices::new(),
            fill_states: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Hash of `order` under this book's domain
    #[inline]
    pub fn hash(&self, order: &Order) -> B256 {
        self.domain.hash_order(order)
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Register a signed order
    ///
    /// # Arguments
    ///
    /// * `order` - The order, exactly as the maker signed it
    /// * `signature` - Maker signature over the order hash
    ///
    /// # Returns
    ///
    /// The order hash
    ///
    /// # Errors
    ///
    /// The first violated field invariant, then `InvalidSignature` if the
    /// signature does not recover to the maker, then `OrderExists`. An
    /// order canceled or fully filled before it was registered is refused
    /// with `OrderCanceled` or `AlreadyFilled`.
    pub fn create_order(&mut self, order: Order, signature: OrderSignature) -> Result<B256> {
        let hash = self.hash(&order);

        order.validate()?;
        signature.verify(&hash, order.maker)?;
        if self.records.contains_key(&hash) {
            return Err(Error::OrderExists);
        }
        let state = self.fill_state(&hash);
        if state.canceled {
            return Err(Error::OrderCanceled);
        }
        if state.is_fully_filled(&order) {
            return Err(Error::AlreadyFilled);
        }

        self.live.insert(&order.index_keys(), hash)?;
        self.records.insert(hash, OrderRecord { order, signature });

        info!(
            hash = %hash,
            maker = %order.maker,
            amount_in = %order.amount_in,
            min_amount_out = %order.min_amount_out,
            "order created"
        );
        self.events.push(Event::OrderCreated {
            hash,
            maker: order.maker,
            source_token: order.source_token,
            destination_token: order.destination_token,
            amount_in: order.amount_in,
            min_amount_out: order.min_amount_out,
            recipient: order.recipient,
            deadline: order.deadline,
        });
        Ok(hash)
    }

    /// Cancel an order on behalf of `caller`, who must be its maker
    ///
    /// A partially filled order can be canceled; its filled amount is kept.
    ///
    /// # Errors
    ///
    /// `OrderNotFound`, `NotMaker`, `AlreadyCanceled` or `AlreadyFilled`.
    pub fn cancel_order(&mut self, caller: Address, hash: &B256) -> Result<()> {
        let order = self.records.get(hash).ok_or(Error::OrderNotFound)?.order;
        if order.maker != caller {
            return Err(Error::NotMaker);
        }
        self.cancel(*hash, &order)
    }

    /// Cancel an order with a maker signature over its cancel digest
    ///
    /// Lets a relayer submit the cancellation for the maker.
    pub fn cancel_order_signed(&mut self, hash: &B256, signature: &OrderSignature) -> Result<()> {
        let order = self.records.get(hash).ok_or(Error::OrderNotFound)?.order;
        self.check_cancel_signature(hash, &order, signature)?;
        self.cancel(*hash, &order)
    }

    /// Cancel `order` whether or not it was ever registered
    ///
    /// Signed orders can be filled without registration, so the maker
    /// cancels them by value.
    ///
    /// # Errors
    ///
    /// `NotMaker`, `AlreadyCanceled` or `AlreadyFilled`.
    pub fn cancel_order_by_value(&mut self, caller: Address, order: &Order) -> Result<B256> {
        if order.maker != caller {
            return Err(Error::NotMaker);
        }
        let hash = self.hash(order);
        self.cancel(hash, order)?;
        Ok(hash)
    }

    /// Cancel `order` by value with a maker signature over its cancel digest
    pub fn cancel_order_by_value_signed(
        &mut self,
        order: &Order,
        signature: &OrderSignature,
    ) -> Result<B256> {
        let hash = self.hash(order);
        self.check_cancel_signature(&hash, order, signature)?;
        self.cancel(hash, order)?;
        Ok(hash)
    }

    fn check_cancel_signature(
        &self,
        hash: &B256,
        order: &Order,
        signature: &OrderSignature,
    ) -> Result<()> {
        if signature.is_signed_by(&self.domain.cancel_digest(hash), order.maker)? {
            Ok(())
        } else {
            Err(Error::NotMaker)
        }
    }

    fn cancel(&mut self, hash: B256, order: &Order) -> Result<()> {
        let state = self.fill_state(&hash);
        if state.canceled {
            return Err(Error::AlreadyCanceled);
        }
        if state.is_fully_filled(order) {
            return Err(Error::AlreadyFilled);
        }

        // Unregistered hashes only get the flag
        if self.live.contains(&hash) {
            let keys = order.index_keys();
            self.live.remove(&keys, &hash)?;
            self.canceled.insert(&keys, hash)?;
        }
        self.fill_states.entry(hash).or_default().canceled = true;

        info!(hash = %hash, maker = %order.maker, "order canceled");
        self.events.push(Event::OrderCanceled { hash });
        Ok(())
    }

    /// Record a settled fill of `amount` against `hash`
    ///
    /// Purges the hash from the live indices once the order is fully
    /// filled. Nothing is modified on error.
    pub(crate) fn apply_fill(
        &mut self,
        hash: B256,
        order: &Order,
        amount: U256,
    ) -> Result<FillState> {
        let mut state = self.fill_state(&hash);
        if state.canceled {
            return Err(Error::OrderCanceled);
        }
        state.filled_amount_in = state
            .filled_amount_in
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        if state.filled_amount_in > order.amount_in {
            return Err(Error::AlreadyFilled);
        }

        if state.is_fully_filled(order) && self.live.contains(&hash) {
            self.live.remove(&order.index_keys(), &hash)?;
            debug!(hash = %hash, "fully filled order removed from live indices");
        }
        self.fill_states.insert(hash, state);
        Ok(state)
    }

    /// Record an `OrderFilled` observation
    pub(crate) fn record_fill_event(&mut self, hash: B256, amount_in: U256, amount_out: U256) {
        self.events.push(Event::OrderFilled {
            hash,
            amount_in,
            amount_out,
        });
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The order stored under `hash`, whatever its state
    pub fn order_of_hash(&self, hash: &B256) -> Option<&Order> {
        self.records.get(hash).map(|record| &record.order)
    }

    pub fn record_of_hash(&self, hash: &B256) -> Option<&OrderRecord> {
        self.records.get(hash)
    }

    /// Check if `hash` can still be filled through the book
    #[inline]
    pub fn is_live(&self, hash: &B256) -> bool {
        self.live.contains(hash)
    }

    #[inline]
    pub fn is_canceled(&self, hash: &B256) -> bool {
        self.fill_state(hash).canceled
    }

    /// Cumulative filled source amount of `hash`, zero if never filled
    pub fn filled_amount_in_of_hash(&self, hash: &B256) -> U256 {
        self.fill_state(hash).filled_amount_in
    }

    pub fn fill_state(&self, hash: &B256) -> FillState {
        self.fill_states.get(hash).copied().unwrap_or_default()
    }

    /// Live hashes in creation order
    pub fn all_hashes(&self, offset: usize, count: usize) -> Vec<B256> {
        self.live.page(&IndexId::All, offset, count)
    }

    pub fn hashes_of_maker(&self, maker: Address, offset: usize, count: usize) -> Vec<B256> {
        self.live.page(&IndexId::Maker(maker), offset, count)
    }

    pub fn hashes_of_source_token(
        &self,
        token: Address,
        offset: usize,
        count: usize,
    ) -> Vec<B256> {
        self.live.page(&IndexId::SourceToken(token), offset, count)
    }

    pub fn hashes_of_destination_token(
        &self,
        token: Address,
        offset: usize,
        count: usize,
    ) -> Vec<B256> {
        self.live.page(&IndexId::DestinationToken(token), offset, count)
    }

    /// Up to `count` live hashes of `id` that follow `after`
    ///
    /// Pass the last hash of the previous page to continue; `None` starts
    /// from the oldest entry.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` if `after` is not live under `id`.
    pub fn hashes_after(
        &self,
        id: &IndexId,
        after: Option<&B256>,
        count: usize,
    ) -> Result<Vec<B256>> {
        self.live
            .page_after(id, after, count)
            .map_err(|_| Error::OrderNotFound)
    }

    pub fn number_of_all_hashes(&self) -> usize {
        self.live.size(&IndexId::All)
    }

    pub fn number_of_hashes_of_maker(&self, maker: Address) -> usize {
        self.live.size(&IndexId::Maker(maker))
    }

    pub fn number_of_hashes_of_source_token(&self, token: Address) -> usize {
        self.live.size(&IndexId::SourceToken(token))
    }

    pub fn number_of_hashes_of_destination_token(&self, token: Address) -> usize {
        self.live.size(&IndexId::DestinationToken(token))
    }

    /// Canceled hashes in cancellation order
    pub fn all_canceled_hashes(&self, offset: usize, count: usize) -> Vec<B256> {
        self.canceled.page(&IndexId::All, offset, count)
    }

    pub fn canceled_hashes_of_maker(
        &self,
        maker: Address,
        offset: usize,
        count: usize,
    ) -> Vec<B256> {
        self.canceled.page(&IndexId::Maker(maker), offset, count)
    }

    pub fn canceled_hashes_of_source_token(
        &self,
        token: Address,
        offset: usize,
        count: usize,
    ) -> Vec<B256> {
        self.canceled.page(&IndexId::SourceToken(token), offset, count)
    }

    pub fn canceled_hashes_of_destination_token(
        &self,
        token: Address,
        offset: usize,
        count: usize,
    ) -> Vec<B256> {
        self.canceled.page(&IndexId::DestinationToken(token), offset, count)
    }

    /// Up to `count` canceled hashes of `id` that follow `after`
    pub fn canceled_hashes_after(
        &self,
        id: &IndexId,
        after: Option<&B256>,
        count: usize,
    ) -> Result<Vec<B256>> {
        self.canceled
            .page_after(id, after, count)
            .map_err(|_| Error::OrderNotFound)
    }

    pub fn number_of_all_canceled_hashes(&self) -> usize {
        self.canceled.size(&IndexId::All)
    }

    pub fn number_of_canceled_hashes_of_maker(&self, maker: Address) -> usize {
        self.canceled.size(&IndexId::Maker(maker))
    }

    pub fn number_of_canceled_hashes_of_source_token(&self, token: Address) -> usize {
        self.canceled.size(&IndexId::SourceToken(token))
    }

    pub fn number_of_canceled_hashes_of_destination_token(&self, token: Address) -> usize {
        self.canceled.size(&IndexId::DestinationToken(token))
    }

    // ========================================================================
    // State Commitment
    // ========================================================================

    /// SHA-256 commitment to the live index order and every fill state
    ///
    /// Two books that saw the same sequence of operations have the same
    /// root.
    pub fn state_root(&self) -> B256 {
        let mut hasher = Sha256::new();
        hasher.update(self.domain.separator());
        for hash in self.live.iter() {
            hasher.update(hash);
        }
        hasher.update((self.number_of_all_hashes() as u64).to_be_bytes());
        for (hash, state) in &self.fill_states {
            hasher.update(hash);
            hasher.update(state.filled_amount_in.to_be_bytes::<32>());
            hasher.update([state.canceled as u8]);
        }
        B256::from_slice(&hasher.finalize())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Pending events, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
