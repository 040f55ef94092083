//! # Authorization Engine
//!
//! Role checks and per-record validation policies.
//!
//! ## Revocation Paths
//!
//! | Caller | Requirement |
//! |--------|-------------|
//! | Oversight organization | none |
//! | Anyone else | role `SUPERVISOR` and membership in the issuing organization |

use crate::config::NotarizationConfig;
use crate::errors::{NotarizationError, NotarizationResult};
use crate::identity::CallerIdentity;
use shared_types::entities::OrgId;
use shared_types::policy::{EndorsementPolicy, PrincipalRole};
use tracing::warn;

/// How a revocation was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationPath {
    /// Caller belongs to the oversight organization.
    Oversight,
    /// Caller is a supervisor of the issuing organization.
    Supervisor,
}

/// Role and policy decisions for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationEngine<'a> {
    config: &'a NotarizationConfig,
}

impl<'a> AuthorizationEngine<'a> {
    /// Create an engine over a configuration.
    #[must_use]
    pub fn new(config: &'a NotarizationConfig) -> Self {
        Self { config }
    }

    /// Require the caller's role attribute to be one of `allowed_roles`.
    ///
    /// The organization is not checked here.
    ///
    /// # Errors
    ///
    /// - `MissingAttribute` - the caller has no role attribute
    /// - `Forbidden` - the role is not allowed
    pub fn require_role(
        &self,
        caller: &CallerIdentity,
        allowed_roles: &[&str],
    ) -> NotarizationResult<()> {
        let attribute = &self.config.role_attribute;
        let Some(role) = caller.attribute(attribute) else {
            warn!(org = %caller.organization, "Caller has no role attribute");
            return Err(NotarizationError::MissingAttribute(attribute.clone()));
        };

        if allowed_roles.contains(&role) {
            return Ok(());
        }

        warn!(org = %caller.organization, role = %role, allowed = ?allowed_roles, "Role rejected");
        Err(NotarizationError::Forbidden(format!(
            "role {role} not in {allowed_roles:?}"
        )))
    }

    /// Validation policy requiring the issuing organization plus every
    /// organization in `extra_required_orgs`.
    ///
    /// The result replaces whatever policy the record carried before.
    #[must_use]
    pub fn compute_validation_policy<I>(
        &self,
        issuing_org: &OrgId,
        extra_required_orgs: I,
    ) -> EndorsementPolicy
    where
        I: IntoIterator<Item = OrgId>,
    {
        let mut policy = EndorsementPolicy::new(PrincipalRole::Peer);
        policy.add_orgs(std::iter::once(issuing_org.clone()));
        policy.add_orgs(extra_required_orgs);
        policy
    }

    /// Policy for a newly issued record: the issuer, plus the oversight
    /// organization when extra approval is requested.
    #[must_use]
    pub fn issuance_policy(&self, issuing_org: &OrgId, require_extra_approval: bool) -> EndorsementPolicy {
        let extra = require_extra_approval.then(|| self.config.oversight_org.clone());
        self.compute_validation_policy(issuing_org, extra)
    }

    /// Policy for a revoked record: the issuer and the oversight organization.
    #[must_use]
    pub fn revocation_policy(&self, issuing_org: &OrgId) -> EndorsementPolicy {
        self.compute_validation_policy(issuing_org, [self.config.oversight_org.clone()])
    }

    /// First half of the revocation check, run before the record is read.
    ///
    /// # Errors
    ///
    /// Same as [`require_role`](Self::require_role) for non-oversight callers.
    pub fn revocation_path(&self, caller: &CallerIdentity) -> NotarizationResult<RevocationPath> {
        if caller.is_member_of(&self.config.oversight_org) {
            return Ok(RevocationPath::Oversight);
        }
        self.require_role(caller, &[self.config.supervisor_role.as_str()])?;
        Ok(RevocationPath::Supervisor)
    }

    /// Full revocation check against the record's issuing organization.
    ///
    /// # Errors
    ///
    /// - errors of [`revocation_path`](Self::revocation_path)
    /// - `Forbidden` - a supervisor from another organization
    pub fn authorize_revocation(
        &self,
        caller: &CallerIdentity,
        issuing_org: &OrgId,
    ) -> NotarizationResult<RevocationPath> {
        let path = self.revocation_path(caller)?;
        if path == RevocationPath::Supervisor && !caller.is_member_of(issuing_org) {
            warn!(
                org = %caller.organization,
                issuer = %issuing_org,
                "Supervisor outside issuing organization"
            );
            return Err(NotarizationError::Forbidden(format!(
                "organization {} did not issue this instrument",
                caller.organization
            )));
        }
        Ok(path)
    }
}
