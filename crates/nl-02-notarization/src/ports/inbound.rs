//! # Driving Port (API - Inbound)
//!
//! The invocation surface offered to clients. A submit simulates the
//! function, commits the result and relays the committed notification; an
//! evaluate only simulates.

use crate::service::{InvocationRequest, InvocationResponse, ServiceError};
use async_trait::async_trait;

/// Primary API of the notarization contract.
///
/// ## Usage
///
/// ```ignore
/// let request = InvocationRequest::new("InstrumentIssue", [payload, "false".into()])
///     .with_credential(credential)
///     .at(timestamp);
/// let response = api.submit(request).await?;
/// ```
#[async_trait]
pub trait NotarizationApi: Send + Sync {
    /// Simulate and commit a function. Returns the function's payload and
    /// the commit receipt details.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Invocation` - the function itself failed; nothing
    ///   was committed
    /// - `ServiceError::Commit` - the substrate rejected the commit
    async fn submit(&self, request: InvocationRequest) -> Result<InvocationResponse, ServiceError>;

    /// Simulate a function without committing. Writes it would make are
    /// discarded.
    ///
    /// # Errors
    ///
    /// `ServiceError::Invocation` if the function failed.
    async fn evaluate(&self, request: InvocationRequest) -> Result<Vec<u8>, ServiceError>;

    /// Name the contract is deployed under.
    fn contract_name(&self) -> &'static str;
}
