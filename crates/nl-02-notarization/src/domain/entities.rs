//! # Domain Entities
//!
//! The instrument record of truth and the shapes that enter and leave the
//! contract. Field names are camelCase on the wire; issue payloads also
//! accept the names used by earlier clients.

use super::value_objects::{ContentHash, InstrumentStatus, PartyRef, SignatureRef};
use serde::{Deserialize, Serialize};
use shared_types::entities::OrgId;

// =============================================================================
// INSTRUMENT
// =============================================================================

/// A notarized legal instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Unique id, immutable once issued.
    pub id: String,
    /// Case the instrument belongs to.
    #[serde(default)]
    pub case_id: String,
    /// Human-facing number; not unique on its own.
    #[serde(default)]
    pub instrument_no: String,
    /// Organization that issued the instrument. Immutable.
    #[serde(alias = "notarizationOffice")]
    pub issuing_organization: OrgId,
    /// Jurisdiction code.
    #[serde(default, alias = "province")]
    pub jurisdiction_code: String,
    /// Parties, in the order supplied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<PartyRef>,
    /// Content address of the off-chain artifact. Immutable.
    #[serde(alias = "docHash")]
    pub content_hash: ContentHash,
    /// Where the artifact can be fetched.
    #[serde(default, alias = "offchainUri")]
    pub offchain_locator: String,
    /// RFC 3339 issuance time from the transaction clock.
    #[serde(default)]
    pub issued_at: String,
    /// Lifecycle status.
    pub status: InstrumentStatus,
    /// RFC 3339 revocation time from the transaction clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<String>,
    /// Reason given at revocation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_reason: Option<String>,
    /// Correlation with the external journal.
    #[serde(default, alias = "journalSeq")]
    pub sequence_number: i64,
    /// Payload encoded in the printed QR code.
    #[serde(default, alias = "qr")]
    pub qr_payload: String,
    /// Attestations, in the order supplied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<SignatureRef>,
}

impl Instrument {
    /// Builds a freshly issued instrument.
    #[must_use]
    pub fn issue(payload: IssuePayload, issuing_organization: OrgId, issued_at: String) -> Self {
        Self {
            id: payload.id,
            case_id: payload.case_id,
            instrument_no: payload.instrument_no,
            issuing_organization,
            jurisdiction_code: payload.jurisdiction_code,
            parties: payload.parties,
            content_hash: payload.content_hash,
            offchain_locator: payload.offchain_locator,
            issued_at,
            status: InstrumentStatus::Issued,
            revoked_at: None,
            revoked_reason: None,
            sequence_number: payload.sequence_number,
            qr_payload: payload.qr_payload,
            signatures: payload.signatures,
        }
    }

    /// Marks the instrument revoked. An empty reason is not recorded.
    pub fn mark_revoked(&mut self, revoked_at: String, reason: &str) {
        self.status = InstrumentStatus::Revoked;
        self.revoked_at = Some(revoked_at);
        if !reason.is_empty() {
            self.revoked_reason = Some(reason.to_string());
        }
    }

    /// Public summary returned by verification.
    #[must_use]
    pub fn verification(&self, candidate_hash: &str) -> VerificationResult {
        VerificationResult {
            id: self.id.clone(),
            instrument_no: self.instrument_no.clone(),
            status: self.status.clone(),
            issuing_organization: self.issuing_organization.clone(),
            issued_at: self.issued_at.clone(),
            hash_match: self.content_hash.matches(candidate_hash),
        }
    }
}

// =============================================================================
// ISSUE PAYLOAD
// =============================================================================

/// Client-supplied fields of a new instrument.
///
/// Every field defaults so that missing required fields are reported
/// together instead of as a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuePayload {
    /// Instrument id.
    pub id: String,
    /// Case id.
    pub case_id: String,
    /// Human-facing number.
    pub instrument_no: String,
    /// Jurisdiction code.
    #[serde(alias = "province")]
    pub jurisdiction_code: String,
    /// Parties.
    pub parties: Vec<PartyRef>,
    /// Content address of the artifact.
    #[serde(alias = "docHash")]
    pub content_hash: ContentHash,
    /// Artifact location.
    #[serde(alias = "offchainUri")]
    pub offchain_locator: String,
    /// Journal correlation.
    #[serde(alias = "journalSeq")]
    pub sequence_number: i64,
    /// QR payload.
    #[serde(alias = "qr")]
    pub qr_payload: String,
    /// Attestations.
    pub signatures: Vec<SignatureRef>,
}

impl IssuePayload {
    /// Names of required fields that are empty after trimming.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("id", self.id.as_str()),
            ("caseId", self.case_id.as_str()),
            ("instrumentNo", self.instrument_no.as_str()),
            ("contentHash", self.content_hash.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

// =============================================================================
// READ MODELS
// =============================================================================

/// Result of checking a candidate hash against an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Instrument id.
    pub id: String,
    /// Human-facing number.
    pub instrument_no: String,
    /// Current status.
    pub status: InstrumentStatus,
    /// Issuing organization.
    pub issuing_organization: OrgId,
    /// Issuance time.
    pub issued_at: String,
    /// Whether the candidate equals the stored hash, ignoring case.
    pub hash_match: bool,
}

/// One committed modification of an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Transaction that made the change.
    pub tx_id: String,
    /// Transaction clock, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Whether the change deleted the record.
    pub is_delete: bool,
    /// Status after the change; empty for a delete.
    pub status: String,
}
