//! # Core Ledger Entities
//!
//! ## Clusters
//!
//! - **Identity**: `OrgId`, `Credential`
//! - **Transactions**: `TxId`, `TxTimestamp`
//! - **Notifications**: `Notification`

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::SubstrateError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Identifier of a member organization (its MSP id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct OrgId(pub String);

impl OrgId {
    /// Creates an organization id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrgId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OrgId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A client credential whose certificate chain has already been verified
/// by the transport layer.
///
/// Carries the issuing organization and the attribute assertions embedded
/// in the certificate (e.g. `role=NOTARY`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Organization that issued the certificate.
    pub msp_id: String,
    /// Attribute assertions, keyed by attribute name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Credential {
    /// Creates a credential for an organization with no attributes.
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute assertion.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Looks up an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Canonical byte encoding, used when deriving transaction ids.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.msp_id.len() + 16 * self.attributes.len());
        out.extend_from_slice(self.msp_id.as_bytes());
        for (name, value) in &self.attributes {
            out.push(0);
            out.extend_from_slice(name.as_bytes());
            out.push(b'=');
            out.extend_from_slice(value.as_bytes());
        }
        out
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// Transaction identifier assigned when a proposal is created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    /// Creates a transaction id from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives a transaction id as `hex(sha256(nonce || creator))`.
    ///
    /// Every endorser recomputes the same id from the signed proposal, so the
    /// id is bound to both the submitter and its one-time nonce.
    #[must_use]
    pub fn derive(nonce: &[u8], creator: &Credential) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(nonce);
        hasher.update(creator.canonical_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic transaction clock value.
///
/// Stamped by the submitting client into the proposal header and identical
/// for every party that validates the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct TxTimestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..1_000_000_000`.
    pub nanos: i32,
}

impl TxTimestamp {
    /// Creates a timestamp.
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Creates a timestamp with zero nanoseconds.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Formats the timestamp as RFC 3339 in UTC with second precision
    /// (`2024-01-01T00:00:00Z`).
    ///
    /// # Errors
    ///
    /// Returns `SubstrateError::InvalidTimestamp` when the value is outside
    /// the representable calendar range or `nanos` is out of bounds.
    pub fn to_rfc3339(&self) -> Result<String, SubstrateError> {
        let invalid = || SubstrateError::InvalidTimestamp {
            seconds: self.seconds,
            nanos: self.nanos,
        };
        let nanos = u32::try_from(self.nanos).map_err(|_| invalid())?;
        if nanos >= 1_000_000_000 {
            return Err(invalid());
        }
        let datetime: DateTime<Utc> =
            DateTime::from_timestamp(self.seconds, nanos).ok_or_else(invalid)?;
        Ok(datetime.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

// =============================================================================
// CLUSTER C: NOTIFICATIONS
// =============================================================================

/// A notification committed alongside a transaction.
///
/// Delivered to subscribers as `{name, originatingTransactionId, payload}`.
/// Ordering across different records is not guaranteed and delivery may
/// repeat, so subscribers must be idempotent.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification name (e.g. `instrument.issued`).
    pub name: String,
    /// Transaction that produced the notification.
    pub originating_transaction_id: TxId,
    /// Serialized payload.
    #[serde_as(as = "Bytes")]
    pub payload: Vec<u8>,
}

impl Notification {
    /// Creates a notification.
    pub fn new(name: impl Into<String>, tx_id: TxId, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            originating_transaction_id: tx_id,
            payload,
        }
    }

    /// Decodes the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `SubstrateError::Serialization` if the payload is not valid
    /// JSON for `T`.
    pub fn payload_json<T: DeserializeOwned>(&self) -> Result<T, SubstrateError> {
        serde_json::from_slice(&self.payload)
            .map_err(|e| SubstrateError::Serialization(e.to_string()))
    }
}
