//! # Error Types
//!
//! Errors raised by the ledger substrate, shared by every crate that talks
//! to it.

use crate::entities::{OrgId, TxId};
use thiserror::Error;

/// Errors surfaced by the ledger substrate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstrateError {
    /// A key or composite key component is not acceptable.
    #[error("Invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A value was empty where the substrate requires content.
    #[error("Empty value for key {key:?}")]
    EmptyValue { key: String },

    /// The proposal timestamp cannot be represented.
    #[error("Invalid transaction timestamp: {seconds}s {nanos}ns")]
    InvalidTimestamp { seconds: i64, nanos: i32 },

    /// The creator identity could not be produced.
    #[error("Creator identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// A private collection was read by a peer outside its organization.
    #[error("Private collection {collection} is not readable by {org}")]
    PrivateDataAccessDenied { collection: String, org: OrgId },

    /// A key read during simulation changed before commit.
    #[error("MVCC read conflict on key {key:?}")]
    MvccReadConflict { key: String },

    /// The endorsements do not satisfy a key's validation parameter.
    #[error("Endorsement policy failure on key {key:?}: missing {missing:?}")]
    EndorsementPolicyFailure { key: String, missing: Vec<OrgId> },

    /// The proposal carried no endorsements.
    #[error("Transaction {0} has no endorsements")]
    NoEndorsements(TxId),

    /// A transaction with the same id was already committed.
    #[error("Duplicate transaction id: {0}")]
    DuplicateTxId(TxId),

    /// Encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SubstrateError {
    /// Returns true if resubmitting the same invocation with a fresh
    /// transaction id may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MvccReadConflict { .. })
    }
}
