//! # Ports Layer
//!
//! The contract between chaincode and the ledger. Chaincode is written
//! against [`ChaincodeStub`]; the reference ledger in `adapters` and any
//! production substrate implement it.

pub mod context;
pub mod private_store;
pub mod record_store;

pub use context::{ChaincodeStub, TransactionContext};
pub use private_store::{
    implicit_collection_for, implicit_collection_owner, PrivatePartitionStore,
    IMPLICIT_COLLECTION_PREFIX,
};
pub use record_store::RecordStore;
