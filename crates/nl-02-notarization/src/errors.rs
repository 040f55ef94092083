//! # Error Types
//!
//! Every failure aborts the invocation; the substrate discards all buffered
//! writes, so no error path needs cleanup.

use serde::{Deserialize, Serialize};
use shared_types::errors::SubstrateError;
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR KINDS
// =============================================================================

/// Stable classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or missing input, or an invalid transition.
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// Role or organization check failed.
    #[serde(rename = "AUTHORIZATION_ERROR")]
    Authorization,
    /// Referenced record absent.
    NotFound,
    /// Required transient data absent.
    MissingPayload,
    /// Caller identity unresolvable.
    #[serde(rename = "IDENTITY_ERROR")]
    Identity,
    /// Stored data malformed.
    CorruptState,
    /// Instrument id already issued.
    AlreadyExists,
    /// Store or commit failure surfaced by the substrate.
    #[serde(rename = "SUBSTRATE_ERROR")]
    Substrate,
}

impl ErrorKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::MissingPayload => "MISSING_PAYLOAD",
            Self::Identity => "IDENTITY_ERROR",
            Self::CorruptState => "CORRUPT_STATE",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Substrate => "SUBSTRATE_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NOTARIZATION ERRORS
// =============================================================================

/// Errors raised by the notarization core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotarizationError {
    /// Input is malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Required payload fields are empty.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The requested status change is not allowed.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// The caller carries no value for the role attribute.
    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    /// Role or organization check failed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Referenced record absent.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record, e.g. `instrument`.
        entity: &'static str,
        /// Identifier looked up.
        id: String,
    },

    /// Required transient entry absent or empty.
    #[error("transient {0} missing")]
    MissingPayload(String),

    /// Caller identity could not be resolved.
    #[error("identity error: {0}")]
    Identity(String),

    /// Stored bytes do not decode.
    #[error("corrupt state at {key:?}: {reason}")]
    CorruptState {
        /// Storage key.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// An instrument with this id was already issued.
    #[error("instrument {0} already exists")]
    AlreadyExists(String),

    /// Substrate call failed.
    #[error("substrate error: {0}")]
    Substrate(#[from] SubstrateError),
}

impl NotarizationError {
    /// Stable kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::MissingFields(_) | Self::InvalidTransition { .. } => {
                ErrorKind::Validation
            }
            Self::MissingAttribute(_) | Self::Forbidden(_) => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MissingPayload(_) => ErrorKind::MissingPayload,
            Self::Identity(_) => ErrorKind::Identity,
            Self::CorruptState { .. } => ErrorKind::CorruptState,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Substrate(inner) => match inner {
                SubstrateError::InvalidKey { .. } | SubstrateError::EmptyValue { .. } => {
                    ErrorKind::Validation
                }
                SubstrateError::IdentityUnavailable(_) => ErrorKind::Identity,
                SubstrateError::PrivateDataAccessDenied { .. } => ErrorKind::Authorization,
                _ => ErrorKind::Substrate,
            },
        }
    }

    /// Shorthand for an instrument lookup miss.
    pub(crate) fn instrument_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "instrument",
            id: id.into(),
        }
    }
}

/// Error body returned across the invocation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl From<&NotarizationError> for ErrorResponse {
    fn from(err: &NotarizationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result type for the notarization core.
pub type NotarizationResult<T> = Result<T, NotarizationError>;
