//! # Event Emitter
//!
//! Attaches the notification a state-changing call commits with. The
//! substrate keeps at most one per transaction and publishes it only if the
//! transaction commits.

use crate::errors::{NotarizationError, NotarizationResult};
use nl_01_ledger_substrate::ports::TransactionContext;
use serde::{Deserialize, Serialize};
use shared_types::entities::OrgId;
use tracing::debug;

/// Notification names.
pub mod topics {
    /// An instrument was issued.
    pub const INSTRUMENT_ISSUED: &str = "instrument.issued";
    /// An instrument was revoked.
    pub const INSTRUMENT_REVOKED: &str = "instrument.revoked";
}

/// Payload of `instrument.issued`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentIssuedPayload {
    /// Instrument id.
    pub id: String,
    /// Human-facing number.
    pub instrument_no: String,
    /// Issuing organization.
    pub issuing_organization: OrgId,
    /// Issuance time.
    pub issued_at: String,
}

/// Payload of `instrument.revoked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRevokedPayload {
    /// Instrument id.
    pub id: String,
    /// Reason as supplied, possibly empty.
    pub reason: String,
}

/// Attach `payload` as the transaction's notification under `name`.
///
/// # Errors
///
/// Encoding or substrate failures.
pub fn emit<S, T>(stub: &mut S, name: &str, payload: &T) -> NotarizationResult<()>
where
    S: TransactionContext + ?Sized,
    T: Serialize,
{
    let bytes = serde_json::to_vec(payload)
        .map_err(|e| NotarizationError::Validation(format!("event payload: {e}")))?;
    debug!(name = %name, bytes = bytes.len(), "Notification attached");
    stub.set_event(name, bytes)?;
    Ok(())
}
