//! # Transaction Context Port
//!
//! Proposal-scoped facts the substrate supplies to chaincode: who is calling,
//! when, with which transient data, and where to attach the notification.

use super::{PrivatePartitionStore, RecordStore};
use shared_types::entities::{Credential, TxId, TxTimestamp};
use shared_types::errors::SubstrateError;

/// Facts about the transaction being simulated.
pub trait TransactionContext {
    /// Identifier of the transaction.
    fn tx_id(&self) -> &TxId;

    /// Deterministic transaction clock, identical for every validator.
    fn tx_timestamp(&self) -> TxTimestamp;

    /// Verified credential of the submitting client.
    ///
    /// # Errors
    ///
    /// `SubstrateError::IdentityUnavailable` if the proposal carries none.
    fn creator(&self) -> Result<&Credential, SubstrateError>;

    /// Transient entry supplied with the proposal. Transient data is never
    /// written to the ledger.
    fn transient(&self, key: &str) -> Option<&[u8]>;

    /// Attaches the notification committed with this transaction. A second
    /// call replaces the first.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), SubstrateError>;
}

/// Everything chaincode can reach during one invocation.
pub trait ChaincodeStub: RecordStore + PrivatePartitionStore + TransactionContext {}

impl<T> ChaincodeStub for T where T: RecordStore + PrivatePartitionStore + TransactionContext + ?Sized {}
