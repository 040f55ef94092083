//! # NL-02 Notarization - Notarized Instrument Lifecycle
//!
//! **Contract name:** `NotarizationContract`
//!
//! ## Purpose
//!
//! Records notarized legal instruments on a ledger shared by organizations
//! that do not trust each other. Issuance and revocation are role-gated,
//! every record carries its own multi-organization validation policy, and
//! personally identifiable data stays in the submitting organization's
//! private partition.
//!
//! ## Lifecycle Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Status only moves `ISSUED -> REVOKED` | `domain/invariants.rs` - `check_transition()` |
//! | `id`, `contentHash`, `issuingOrganization` immutable | `domain/invariants.rs` - `check_immutable_fields()` |
//! | Policy always includes the issuer | `authorization.rs` - `compute_validation_policy()` |
//! | Revoked records require oversight endorsement | `authorization.rs` - `revocation_policy()` |
//! | Private blobs never reach public state | `lifecycle.rs` - `put_private_record()` |
//! | No wall clock, no randomness in the core | `lifecycle.rs` - timestamps from `tx_timestamp()` |
//!
//! ## Authorization
//!
//! | Operation | Requirement |
//! |-----------|-------------|
//! | `issue` | role `NOTARY` |
//! | `revoke` | oversight organization, or role `SUPERVISOR` in the issuing organization |
//! | `putPrivateRecord`, `getPrivateRecord` | any resolved caller, own partition only |
//! | reads | any resolved caller |
//!
//! ## Outbound Dependencies
//!
//! | Collaborator | Trait | Purpose |
//! |--------------|-------|---------|
//! | Ledger substrate | `ChaincodeStub` | state, history, policies, private data, clock, identity |
//! | Notification bus | `NotificationPublisher` | relay committed notifications |
//!
//! ## Usage Example
//!
//! ```ignore
//! use nl_02_notarization::prelude::*;
//!
//! let service = NotarizationService::new(ledger, bus, ServiceConfig::default());
//! let response = service
//!     .submit(InvocationRequest::new("InstrumentIssue", [payload, "false".into()])
//!         .with_credential(notary))
//!     .await?;
//! let instrument: Instrument = response.json()?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod authorization;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod identity;
pub mod index;
pub mod lifecycle;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::{
        ContentHash, HistoryEntry, Instrument, InstrumentStatus, IssuePayload, PartyRef,
        SignatureRef, ValidationPolicy, VerificationResult,
    };

    // Core components
    pub use crate::authorization::{AuthorizationEngine, RevocationPath};
    pub use crate::events::{topics, InstrumentIssuedPayload, InstrumentRevokedPayload};
    pub use crate::identity::{resolve_caller, CallerIdentity};
    pub use crate::lifecycle::{instrument_key, private_record_key, InstrumentLifecycle};

    // Invocation surface
    pub use crate::adapters::{contract_name, dispatch, dispatch_by_name, ContractFunction};
    pub use crate::ports::inbound::NotarizationApi;
    pub use crate::service::{
        InvocationRequest, InvocationResponse, NotarizationService, ServiceConfig, ServiceError,
        ServiceStats,
    };

    // Configuration & errors
    pub use crate::config::NotarizationConfig;
    pub use crate::errors::{ErrorKind, ErrorResponse, NotarizationError, NotarizationResult};
}

pub use config::NotarizationConfig;
pub use errors::{ErrorKind, NotarizationError, NotarizationResult};
pub use lifecycle::InstrumentLifecycle;
pub use service::{NotarizationService, ServiceConfig};
