//! # Ledger Entities
//!
//! Versions, history entries and commit receipts produced by the ledger.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Notification, TxId, TxTimestamp};

/// Position of the transaction that last wrote a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Block height of the writing transaction.
    pub block_num: u64,
    /// Index of the transaction inside the block.
    pub tx_num: u64,
}

impl Version {
    /// Creates a version.
    #[must_use]
    pub const fn new(block_num: u64, tx_num: u64) -> Self {
        Self { block_num, tx_num }
    }
}

/// One committed modification of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyModification {
    /// Transaction that made the change.
    pub tx_id: TxId,
    /// Transaction clock of that transaction.
    pub timestamp: TxTimestamp,
    /// Value written, `None` for a delete.
    pub value: Option<Vec<u8>>,
    /// Whether the change deleted the key.
    pub is_delete: bool,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Committed transaction.
    pub tx_id: TxId,
    /// Block the transaction was committed in.
    pub block_height: u64,
    /// Public keys whose value or validation parameter changed.
    pub keys_written: usize,
    /// Private entries written.
    pub private_writes: usize,
    /// Notification attached by the transaction, if any.
    pub notification: Option<Notification>,
}

impl CommitReceipt {
    /// Returns true if the transaction changed nothing.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.keys_written == 0 && self.private_writes == 0 && self.notification.is_none()
    }
}
