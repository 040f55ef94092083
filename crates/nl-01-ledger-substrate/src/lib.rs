//! # NL-01 Ledger Substrate - Shared Record Ledger
//!
//! The contract between notarization chaincode and the ledger it runs on,
//! plus an in-memory reference ledger that honors it.
//!
//! ## Purpose
//!
//! Every organization on the network validates every transaction by
//! replaying it. The substrate therefore owns everything that must be
//! identical across validators: committed state, per-key validation
//! parameters, modification history, private partitions, the transaction
//! clock and the caller's verified credential.
//!
//! ## Substrate Guarantees
//!
//! | Guarantee | Enforcement Location |
//! |-----------|---------------------|
//! | Atomic commit-or-abort per transaction | `adapters/memory_ledger.rs` - `InMemoryLedger::commit()` |
//! | Optimistic concurrency on every key read | `adapters/memory_ledger.rs` - `validate_reads()` |
//! | State-based endorsement | `adapters/memory_ledger.rs` - `validate_endorsements()` |
//! | Private data never enters public state | `ports/private_store.rs`, separate private map |
//! | Deterministic clock | `ports/context.rs` - `TransactionContext::tx_timestamp()` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use nl_01_ledger_substrate::prelude::*;
//!
//! let ledger = InMemoryLedger::new();
//! let mut sim = ledger.begin(Proposal::new(tx_id, timestamp, credential));
//! sim.put_state("INS|1", bytes)?;
//! let receipt = sim.commit()?;
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
pub mod domain;
pub mod ports;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{InMemoryLedger, LedgerConfig, Proposal, ReadWriteSet, TxSimulation};
    pub use crate::domain::{
        create_composite_key, split_composite_key, CommitReceipt, KeyModification, Version,
    };
    pub use crate::ports::{
        implicit_collection_for, ChaincodeStub, PrivatePartitionStore, RecordStore,
        TransactionContext,
    };
    pub use shared_types::entities::{Credential, Notification, OrgId, TxId, TxTimestamp};
    pub use shared_types::errors::SubstrateError;
    pub use shared_types::policy::{EndorsementPolicy, PrincipalRole};
}

pub use adapters::{InMemoryLedger, LedgerConfig, Proposal, ReadWriteSet, TxSimulation};
pub use domain::{CommitReceipt, KeyModification, Version};
pub use ports::{ChaincodeStub, PrivatePartitionStore, RecordStore, TransactionContext};
