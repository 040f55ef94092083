//! # Notification Publisher
//!
//! Defines the publishing side of the bus.

use crate::events::{EventFilter, Notification};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing committed notifications.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publish a notification to the bus.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the notification.
    async fn publish(&self, notification: Notification) -> usize;

    /// Get the total number of notifications published.
    fn notifications_published(&self) -> u64;
}

/// In-memory implementation of the bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics.
/// Suitable for a single process; a deployment relaying to remote monitors
/// would implement `NotificationPublisher` over its own transport.
pub struct InMemoryEventBus {
    /// Broadcast sender for notifications.
    sender: broadcast::Sender<Notification>,

    /// Total notifications published.
    notifications_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            notifications_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to notifications matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(names = ?filter.names, "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationPublisher for InMemoryEventBus {
    async fn publish(&self, notification: Notification) -> usize {
        let name = notification.name.clone();
        let tx_id = notification.originating_transaction_id.clone();

        self.notifications_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(notification) {
            Ok(receiver_count) => {
                debug!(
                    name = %name,
                    tx_id = %tx_id,
                    receivers = receiver_count,
                    "Notification published"
                );
                receiver_count
            }
            Err(e) => {
                warn!(
                    name = %name,
                    tx_id = %tx_id,
                    error = %e,
                    "Notification dropped (no receivers)"
                );
                0
            }
        }
    }

    fn notifications_published(&self) -> u64 {
        self.notifications_published.load(Ordering::Relaxed)
    }
}
