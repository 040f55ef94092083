//! # Value Objects
//!
//! Immutable values carried by an instrument.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// STATUS
// =============================================================================

/// Lifecycle status of an instrument.
///
/// `Other` keeps statuses written by a newer lifecycle readable; such
/// records can be read and verified but not revoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstrumentStatus {
    /// In force.
    Issued,
    /// Withdrawn. Terminal.
    Revoked,
    /// Unrecognized stored value.
    Other(String),
}

impl InstrumentStatus {
    /// Stored representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Issued => "ISSUED",
            Self::Revoked => "REVOKED",
            Self::Other(s) => s,
        }
    }

    /// Returns true for a status no transition leaves.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl From<String> for InstrumentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ISSUED" => Self::Issued,
            "REVOKED" => Self::Revoked,
            _ => Self::Other(value),
        }
    }
}

impl From<InstrumentStatus> for String {
    fn from(value: InstrumentStatus) -> Self {
        match value {
            InstrumentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for InstrumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CONTENT HASH
// =============================================================================

/// Content address of the off-chain artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Wraps a hash string as supplied.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Stored representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison with a candidate hash.
    ///
    /// Compares Unicode lowercase mappings character by character, so hex
    /// digests match regardless of the case a client chose.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0
            .chars()
            .flat_map(char::to_lowercase)
            .eq(candidate.chars().flat_map(char::to_lowercase))
    }
}

// =============================================================================
// PARTIES AND SIGNATURES
// =============================================================================

/// Reference to a party of the instrument. Opaque to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartyRef {
    /// Party identifier.
    #[serde(default)]
    pub id: String,
    /// Role of the party in the instrument.
    #[serde(default)]
    pub role: String,
    /// Name shown to humans.
    #[serde(default, alias = "name")]
    pub display_name: String,
}

/// Attestation attached at issuance. Not validated by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRef {
    /// Certificate subject of the signer.
    #[serde(default, alias = "subject")]
    pub subject_name: String,
    /// Certificate serial number.
    #[serde(default, alias = "certSn")]
    pub certificate_serial: String,
    /// Signature algorithm.
    #[serde(default, alias = "algo")]
    pub algorithm: String,
    /// Signing time as supplied by the client.
    #[serde(default, alias = "time")]
    pub timestamp: String,
}
