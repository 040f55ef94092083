//! # Identity Context
//!
//! Resolves who is calling from the verified credential the substrate
//! supplies. Resolution is a pure read and runs fresh on every invocation;
//! nothing is cached between transactions.

use crate::errors::{NotarizationError, NotarizationResult};
use nl_01_ledger_substrate::ports::TransactionContext;
use shared_types::entities::OrgId;
use std::collections::BTreeMap;
use tracing::debug;

/// The resolved caller of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Caller's organization.
    pub organization: OrgId,
    /// Attribute assertions from the caller's certificate.
    pub role_attributes: BTreeMap<String, String>,
}

impl CallerIdentity {
    /// Value of an attribute, if asserted.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.role_attributes.get(name).map(String::as_str)
    }

    /// Returns true if the caller belongs to `org`.
    #[must_use]
    pub fn is_member_of(&self, org: &OrgId) -> bool {
        &self.organization == org
    }
}

fn has_control_chars(value: &str) -> bool {
    value.chars().any(char::is_control)
}

/// Resolve the caller of the current transaction.
///
/// # Errors
///
/// `NotarizationError::Identity` if the substrate has no credential, the
/// organization id is blank or contains control characters, or an attribute
/// is malformed (empty name, control characters, or an empty value for
/// `role_attribute`).
pub fn resolve_caller<S>(stub: &S, role_attribute: &str) -> NotarizationResult<CallerIdentity>
where
    S: TransactionContext + ?Sized,
{
    let credential = stub
        .creator()
        .map_err(|e| NotarizationError::Identity(e.to_string()))?;

    let organization = OrgId::new(credential.msp_id.clone());
    if organization.is_blank() || has_control_chars(organization.as_str()) {
        return Err(NotarizationError::Identity(
            "credential carries no valid organization id".to_string(),
        ));
    }

    for (name, value) in &credential.attributes {
        if name.is_empty() || has_control_chars(name) || has_control_chars(value) {
            return Err(NotarizationError::Identity(format!(
                "malformed attribute {name:?}"
            )));
        }
        if name == role_attribute && value.trim().is_empty() {
            return Err(NotarizationError::Identity(format!(
                "attribute {role_attribute} is empty"
            )));
        }
    }

    debug!(org = %organization, attributes = credential.attributes.len(), "Caller resolved");

    Ok(CallerIdentity {
        organization,
        role_attributes: credential.attributes.clone(),
    })
}
