//! # Delivery Deduplicator
//!
//! Delivery from the bus is at-least-once. A subscriber that must act once
//! per notification records each delivery here and skips repeats.
//!
//! ## Design
//!
//! - A delivery is identified by `(originating transaction id, name)`; a
//!   transaction commits at most one notification, so the pair is unique.
//! - Memory is bounded by an LRU capacity instead of a time window, so the
//!   cache never consults a clock and behaves identically on replay.
//!   Lookups do not promote, so eviction follows first delivery.

use lru::LruCache;
use shared_types::entities::{Notification, TxId};
use std::num::NonZeroUsize;
use thiserror::Error;

/// Errors from deduplicator operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DedupError {
    /// The notification has already been delivered.
    #[error("Notification {name} from transaction {tx_id} already delivered")]
    AlreadyDelivered { tx_id: TxId, name: String },
}

type DeliveryKey = (TxId, String);

/// Bounded record of delivered notifications.
pub struct DeliveryDeduplicator {
    /// Deliveries currently remembered.
    seen: LruCache<DeliveryKey, ()>,
}

impl DeliveryDeduplicator {
    /// Create a deduplicator with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(crate::DEFAULT_DEDUP_CAPACITY)
    }

    /// Create a deduplicator remembering at most `capacity` deliveries.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            seen: LruCache::new(cap),
        }
    }

    fn key(notification: &Notification) -> DeliveryKey {
        (
            notification.originating_transaction_id.clone(),
            notification.name.clone(),
        )
    }

    /// Record a delivery, rejecting it if it was seen before.
    ///
    /// # Errors
    ///
    /// - `DedupError::AlreadyDelivered` - the same `(tx id, name)` pair is
    ///   still remembered
    pub fn check_and_record(&mut self, notification: &Notification) -> Result<(), DedupError> {
        let key = Self::key(notification);
        if self.seen.contains(&key) {
            return Err(DedupError::AlreadyDelivered {
                tx_id: key.0,
                name: key.1,
            });
        }
        self.seen.put(key, ());
        Ok(())
    }

    /// Check if a delivery is remembered without recording it.
    #[must_use]
    pub fn contains(&self, notification: &Notification) -> bool {
        self.seen.contains(&Self::key(notification))
    }

    /// Number of remembered deliveries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Maximum number of remembered deliveries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.seen.cap().get()
    }
}

impl Default for DeliveryDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}
