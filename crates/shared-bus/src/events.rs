//! # Notification Filters
//!
//! The bus carries `shared_types::Notification` values as committed by the
//! ledger. Subscribers narrow the stream with an [`EventFilter`].

pub use shared_types::entities::Notification;
use shared_types::entities::TxId;

/// Filter for subscribing to specific notifications.
///
/// Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Notification names to include (e.g. `instrument.revoked`).
    pub names: Vec<String>,
    /// Originating transactions to include.
    pub transactions: Vec<TxId>,
}

impl EventFilter {
    /// Create a filter that matches all notifications.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific notification names.
    #[must_use]
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            transactions: Vec::new(),
        }
    }

    /// Create a filter for notifications produced by specific transactions.
    #[must_use]
    pub fn from_transactions(transactions: Vec<TxId>) -> Self {
        Self {
            names: Vec::new(),
            transactions,
        }
    }

    /// Check if a notification matches this filter.
    #[must_use]
    pub fn matches(&self, notification: &Notification) -> bool {
        let name_match = self.names.is_empty() || self.names.contains(&notification.name);

        let tx_match = self.transactions.is_empty()
            || self
                .transactions
                .contains(&notification.originating_transaction_id);

        name_match && tx_match
    }
}
