//! # Shared Types Crate
//!
//! Primitives that cross crate boundaries in the Notary-Ledger workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers, the transaction clock, verified
//!   credentials and endorsement policies are defined once, here.
//! - **Determinism**: nothing in this crate reads the system clock or a
//!   random source. Time only enters through [`TxTimestamp`], which the
//!   substrate stamps on a proposal.
//! - **Opaque Identity**: a [`Credential`] is produced by the transport after
//!   certificate verification; consumers only read it.

pub mod entities;
pub mod errors;
pub mod policy;

pub use entities::*;
pub use errors::*;
pub use policy::*;
