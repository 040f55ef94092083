//! # Notarization Configuration
//!
//! Names the organizations, roles and keys the lifecycle depends on. Read
//! once when the service starts; every invocation sees the same values, so
//! replay on another validator produces the same result.

use shared_types::entities::OrgId;
use std::env;
use thiserror::Error;

/// Default oversight organization.
pub const DEFAULT_OVERSIGHT_ORG: &str = "MOJMSP";
/// Default role allowed to issue.
pub const DEFAULT_ISSUER_ROLE: &str = "NOTARY";
/// Default role allowed to revoke within the issuing organization.
pub const DEFAULT_SUPERVISOR_ROLE: &str = "SUPERVISOR";
/// Default credential attribute carrying the role.
pub const DEFAULT_ROLE_ATTRIBUTE: &str = "role";
/// Default transient key carrying a private record.
pub const DEFAULT_PRIVATE_TRANSIENT_KEY: &str = "pii";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is blank.
    #[error("{0} must not be empty")]
    Blank(&'static str),
    /// Two settings that must differ are equal.
    #[error("{0} and {1} must differ")]
    Conflict(&'static str, &'static str),
}

/// Lifecycle configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotarizationConfig {
    /// Organization whose members may revoke any instrument and whose
    /// endorsement is required on revoked records.
    pub oversight_org: OrgId,
    /// Role required to issue.
    pub issuer_role: String,
    /// Role required to revoke within the issuing organization.
    pub supervisor_role: String,
    /// Credential attribute holding the caller's role.
    pub role_attribute: String,
    /// Transient key holding a private record blob.
    pub private_transient_key: String,
    /// Whether issuing an existing, still-issued id overwrites it instead
    /// of failing with `ALREADY_EXISTS`.
    pub allow_reissue: bool,
}

impl Default for NotarizationConfig {
    fn default() -> Self {
        Self {
            oversight_org: OrgId::new(DEFAULT_OVERSIGHT_ORG),
            issuer_role: DEFAULT_ISSUER_ROLE.to_string(),
            supervisor_role: DEFAULT_SUPERVISOR_ROLE.to_string(),
            role_attribute: DEFAULT_ROLE_ATTRIBUTE.to_string(),
            private_transient_key: DEFAULT_PRIVATE_TRANSIENT_KEY.to_string(),
            allow_reissue: false,
        }
    }
}

impl NotarizationConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `NL_OVERSIGHT_MSP`: oversight organization (default: MOJMSP)
    /// - `NL_ISSUER_ROLE`: issuing role (default: NOTARY)
    /// - `NL_SUPERVISOR_ROLE`: revoking role (default: SUPERVISOR)
    /// - `NL_ROLE_ATTRIBUTE`: role attribute name (default: role)
    /// - `NL_PRIVATE_TRANSIENT_KEY`: transient key for private records (default: pii)
    /// - `NL_ALLOW_REISSUE`: overwrite on duplicate issue (default: false)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let text = |name: &str, fallback: String| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
        };

        Self {
            oversight_org: OrgId::new(text("NL_OVERSIGHT_MSP", defaults.oversight_org.0)),
            issuer_role: text("NL_ISSUER_ROLE", defaults.issuer_role),
            supervisor_role: text("NL_SUPERVISOR_ROLE", defaults.supervisor_role),
            role_attribute: text("NL_ROLE_ATTRIBUTE", defaults.role_attribute),
            private_transient_key: text(
                "NL_PRIVATE_TRANSIENT_KEY",
                defaults.private_transient_key,
            ),
            allow_reissue: env::var("NL_ALLOW_REISSUE")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.allow_reissue),
        }
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Blank` - a name is empty
    /// - `ConfigError::Conflict` - issuer and supervisor roles coincide
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oversight_org.is_blank() {
            return Err(ConfigError::Blank("oversight_org"));
        }
        for (name, value) in [
            ("issuer_role", &self.issuer_role),
            ("supervisor_role", &self.supervisor_role),
            ("role_attribute", &self.role_attribute),
            ("private_transient_key", &self.private_transient_key),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Blank(name));
            }
        }
        if self.issuer_role == self.supervisor_role {
            return Err(ConfigError::Conflict("issuer_role", "supervisor_role"));
        }
        Ok(())
    }

    /// Builder: set the oversight organization.
    #[must_use]
    pub fn with_oversight_org(mut self, org: impl Into<OrgId>) -> Self {
        self.oversight_org = org.into();
        self
    }

    /// Builder: allow overwriting an issued id.
    #[must_use]
    pub fn with_reissue(mut self, allow: bool) -> Self {
        self.allow_reissue = allow;
        self
    }
}
