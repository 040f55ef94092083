//! # Endorsement Policies
//!
//! A key-level endorsement policy names the organizations whose peers must
//! all endorse any transaction that writes the key. The policy is stored as
//! the key's validation parameter in canonical JSON so that every validating
//! party decodes the same bytes to the same requirement.

use crate::entities::OrgId;
use crate::errors::SubstrateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Principal role an endorsing identity must hold within its organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalRole {
    /// Endorsing peer of the organization.
    #[default]
    Peer,
    /// Any member of the organization.
    Member,
    /// Administrator of the organization.
    Admin,
}

/// An N-out-of-N endorsement requirement over a set of organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EndorsementPolicy {
    /// Role the endorsing identities must hold.
    pub principal_role: PrincipalRole,
    /// Organizations that must all endorse.
    pub required_orgs: BTreeSet<OrgId>,
}

impl EndorsementPolicy {
    /// Creates an empty policy for the given principal role.
    #[must_use]
    pub fn new(principal_role: PrincipalRole) -> Self {
        Self {
            principal_role,
            required_orgs: BTreeSet::new(),
        }
    }

    /// Adds organizations to the requirement.
    pub fn add_orgs<I>(&mut self, orgs: I)
    where
        I: IntoIterator<Item = OrgId>,
    {
        self.required_orgs.extend(orgs);
    }

    /// Returns true if the organization is required.
    #[must_use]
    pub fn requires(&self, org: &OrgId) -> bool {
        self.required_orgs.contains(org)
    }

    /// Required organizations that are absent from `endorsers`.
    #[must_use]
    pub fn missing_from(&self, endorsers: &BTreeSet<OrgId>) -> Vec<OrgId> {
        self.required_orgs.difference(endorsers).cloned().collect()
    }

    /// Returns true if `endorsers` covers every required organization.
    #[must_use]
    pub fn is_satisfied_by(&self, endorsers: &BTreeSet<OrgId>) -> bool {
        self.required_orgs.is_subset(endorsers)
    }

    /// Encodes the policy as a validation parameter.
    ///
    /// # Errors
    ///
    /// Returns `SubstrateError::Serialization` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SubstrateError> {
        serde_json::to_vec(self).map_err(|e| SubstrateError::Serialization(e.to_string()))
    }

    /// Decodes a validation parameter.
    ///
    /// # Errors
    ///
    /// Returns `SubstrateError::Serialization` if the bytes are not a policy.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SubstrateError> {
        serde_json::from_slice(bytes).map_err(|e| SubstrateError::Serialization(e.to_string()))
    }
}
