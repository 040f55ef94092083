//! # Adapters Layer
//!
//! Implementations of the substrate ports.

pub mod memory_ledger;

pub use memory_ledger::{InMemoryLedger, LedgerConfig, Proposal, ReadWriteSet, TxSimulation};
