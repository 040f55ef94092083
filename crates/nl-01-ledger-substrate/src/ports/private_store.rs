//! # Private Partition Port
//!
//! Per-organization storage whose contents never reach the public state.

use shared_types::entities::OrgId;
use shared_types::errors::SubstrateError;

/// Prefix of the collection implicitly owned by each organization.
pub const IMPLICIT_COLLECTION_PREFIX: &str = "_implicit_org_";

/// Name of the private collection owned by `org`.
#[must_use]
pub fn implicit_collection_for(org: &OrgId) -> String {
    format!("{IMPLICIT_COLLECTION_PREFIX}{org}")
}

/// Owner of an implicit collection, or `None` for any other name.
#[must_use]
pub fn implicit_collection_owner(collection: &str) -> Option<OrgId> {
    collection
        .strip_prefix(IMPLICIT_COLLECTION_PREFIX)
        .filter(|org| !org.is_empty())
        .map(OrgId::from)
}

/// Organization-private data partitions.
pub trait PrivatePartitionStore {
    /// Reads a private entry.
    ///
    /// Only the organization owning the collection may read it.
    fn get_private_data(
        &mut self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, SubstrateError>;

    /// Buffers a write to a private collection.
    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), SubstrateError>;
}
