//! # Domain Invariants
//!
//! Checks that must hold on every transition.
//!
//! - Status only moves `ISSUED -> REVOKED`.
//! - `id`, `contentHash` and `issuingOrganization` never change after issuance.
//! - Key components never contain the composite-key delimiters.

use super::entities::Instrument;
use super::value_objects::InstrumentStatus;
use crate::errors::{NotarizationError, NotarizationResult};

/// Characters reserved by the composite-key encoding.
const RESERVED_KEY_CHARS: [char; 2] = ['\u{0}', '\u{10FFFF}'];

/// Status transition check.
///
/// # Errors
///
/// `NotarizationError::InvalidTransition` unless `from -> to` is
/// `ISSUED -> REVOKED`.
pub fn check_transition(from: &InstrumentStatus, to: &InstrumentStatus) -> NotarizationResult<()> {
    match (from, to) {
        (InstrumentStatus::Issued, InstrumentStatus::Revoked) => Ok(()),
        _ => Err(NotarizationError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Immutable fields are unchanged between two versions of a record.
#[must_use]
pub fn check_immutable_fields(before: &Instrument, after: &Instrument) -> bool {
    before.id == after.id
        && before.content_hash == after.content_hash
        && before.issuing_organization == after.issuing_organization
}

/// A value used inside a storage key is non-empty and free of reserved
/// characters.
///
/// # Errors
///
/// `NotarizationError::Validation` naming the offending field.
pub fn check_key_component(field: &str, value: &str) -> NotarizationResult<()> {
    if value.trim().is_empty() {
        return Err(NotarizationError::Validation(format!("{field} must not be empty")));
    }
    if value.contains(RESERVED_KEY_CHARS) {
        return Err(NotarizationError::Validation(format!(
            "{field} must not contain U+0000 or U+10FFFF"
        )));
    }
    Ok(())
}
