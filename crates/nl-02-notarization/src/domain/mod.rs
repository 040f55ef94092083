//! # Domain Layer
//!
//! Pure business logic: the instrument, its value objects and the
//! invariants every transition must respect. No substrate access.

pub mod entities;
pub mod invariants;
pub mod value_objects;

pub use entities::{HistoryEntry, Instrument, IssuePayload, VerificationResult};
pub use invariants::{check_immutable_fields, check_key_component, check_transition};
pub use shared_types::policy::EndorsementPolicy as ValidationPolicy;
pub use value_objects::{ContentHash, InstrumentStatus, PartyRef, SignatureRef};
