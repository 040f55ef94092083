//! # Shared Bus - Notification Relay
//!
//! Carries notifications from committed transactions to external
//! subscribers (monitors, indexers, client applications).
//!
//! ## Delivery Contract
//!
//! ```text
//! ┌──────────────┐   commit    ┌──────────────┐  publish()  ┌──────────────┐
//! │  Chaincode   │ ──────────→ │    Ledger    │ ──────────→ │  Event Bus   │
//! │ (set_event)  │             │ (atomic)     │             │              │
//! └──────────────┘             └──────────────┘             └──────┬───────┘
//!                                                                  │ subscribe()
//!                                                                  ↓
//!                                                           ┌──────────────┐
//!                                                           │ Subscribers  │
//!                                                           └──────────────┘
//! ```
//!
//! - Only committed notifications are published; aborted transactions
//!   never reach the bus.
//! - Delivery is at-least-once and unordered across records. Subscribers
//!   that cannot tolerate repeats wrap their subscription with a
//!   [`DeliveryDeduplicator`].

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod dedup;
pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use dedup::{DedupError, DeliveryDeduplicator};
pub use events::{EventFilter, Notification};
pub use publisher::{InMemoryEventBus, NotificationPublisher};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum notifications to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Default number of deliveries remembered by a deduplicator.
pub const DEFAULT_DEDUP_CAPACITY: usize = 10_000;
