//! # Driven Ports (SPI - Outbound)
//!
//! The core depends on two collaborators it does not implement:
//!
//! - the ledger substrate, reached through [`ChaincodeStub`] during one
//!   simulated transaction;
//! - the notification publisher, which relays notifications after the
//!   substrate has committed them.

pub use nl_01_ledger_substrate::ports::{
    ChaincodeStub, PrivatePartitionStore, RecordStore, TransactionContext,
};
pub use shared_bus::NotificationPublisher;
