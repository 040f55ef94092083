//! # Record Store Port
//!
//! Key-addressed public state visible to every organization.

use crate::domain::KeyModification;
use shared_types::errors::SubstrateError;

/// Public world state as seen by a transaction during simulation.
///
/// Reads return the last committed value; writes are buffered and become
/// visible only when the transaction commits. Implementations record every
/// read so that the commit can be rejected if a read key changed meanwhile.
pub trait RecordStore {
    /// Reads the committed value of a key.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - the key exists
    /// * `None` - the key was never written
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, SubstrateError>;

    /// Buffers a write of `value` under `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), SubstrateError>;

    /// Returns every `(key, value)` whose composite key begins with
    /// `object_type` and `attributes`, in key order.
    fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<Vec<(String, Vec<u8>)>, SubstrateError>;

    /// Returns the committed modifications of a key, oldest first.
    fn get_history_for_key(&mut self, key: &str) -> Result<Vec<KeyModification>, SubstrateError>;

    /// Reads the validation parameter attached to a key.
    fn get_state_validation_parameter(
        &mut self,
        key: &str,
    ) -> Result<Option<Vec<u8>>, SubstrateError>;

    /// Buffers a replacement of the validation parameter attached to a key.
    ///
    /// Once committed, every later write to the key must be endorsed by the
    /// organizations the parameter names.
    fn set_state_validation_parameter(
        &mut self,
        key: &str,
        parameter: Vec<u8>,
    ) -> Result<(), SubstrateError>;
}
