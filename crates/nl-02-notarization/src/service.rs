//! # Notarization Service
//!
//! Client-side wrapper that turns an invocation request into a proposal,
//! simulates it against the reference ledger, commits it and relays the
//! committed notification to the bus.
//!
//! ## Flow
//!
//! ```text
//! InvocationRequest ──→ Proposal ──→ dispatch() ──→ ReadWriteSet
//!                                                       │
//!              publisher.publish() ←── receipt ←── ledger.commit()
//! ```
//!
//! The core never sees the wall clock. When a request carries no timestamp
//! the service stamps one before building the proposal, the way a client
//! SDK does.

use crate::adapters::dispatcher::{self, ContractFunction, CONTRACT_NAME};
use crate::config::{ConfigError, NotarizationConfig};
use crate::errors::{ErrorKind, ErrorResponse, NotarizationError};
use crate::ports::inbound::NotarizationApi;
use async_trait::async_trait;
use nl_01_ledger_substrate::adapters::{InMemoryLedger, Proposal};
use nl_01_ledger_substrate::domain::CommitReceipt;
use shared_bus::NotificationPublisher;
use shared_types::entities::{Credential, Notification, OrgId, TxId, TxTimestamp};
use shared_types::errors::SubstrateError;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[cfg(feature = "metrics")]
use notary_telemetry::{
    metric_inc, COMMIT_CONFLICTS, INSTRUMENTS_ISSUED, INSTRUMENTS_REVOKED, NOTIFICATIONS_PUBLISHED,
};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Contract configuration.
    pub notarization: NotarizationConfig,
    /// Relay committed notifications to the publisher.
    pub relay_notifications: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            notarization: NotarizationConfig::default(),
            relay_notifications: true,
        }
    }
}

impl ServiceConfig {
    /// Load from the environment. `NL_RELAY_NOTIFICATIONS` toggles relaying;
    /// the contract settings come from [`NotarizationConfig::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        let relay_notifications = std::env::var("NL_RELAY_NOTIFICATIONS")
            .map(|v| !matches!(v.as_str(), "0" | "false" | "FALSE" | "no"))
            .unwrap_or(true);
        Self {
            notarization: NotarizationConfig::from_env(),
            relay_notifications,
        }
    }
}

/// Statistics for the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Submit calls received.
    pub submitted: u64,
    /// Submits that committed.
    pub committed: u64,
    /// Evaluate calls received.
    pub evaluated: u64,
    /// Calls whose function failed.
    pub failed_invocations: u64,
    /// Commits rejected by the read-set check.
    pub commit_conflicts: u64,
    /// Commits rejected for any other reason.
    pub rejected_commits: u64,
    /// Notifications handed to the publisher.
    pub notifications_relayed: u64,
}

// =============================================================================
// REQUESTS & RESPONSES
// =============================================================================

/// One client invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationRequest {
    /// Function name, optionally prefixed with the contract name.
    pub function: String,
    /// String arguments.
    pub args: Vec<String>,
    /// Verified credential of the caller.
    pub credential: Option<Credential>,
    /// Transient entries; never written to the ledger.
    pub transient: BTreeMap<String, Vec<u8>>,
    /// Transaction clock; stamped by the service when absent.
    pub timestamp: Option<TxTimestamp>,
    /// Additional endorsing organizations besides the caller's own.
    pub endorsers: Vec<OrgId>,
    /// Proposal nonce; a random one is drawn when absent.
    pub nonce: Option<Vec<u8>>,
}

impl InvocationRequest {
    /// Create a request for `function` with `args`.
    pub fn new<I, A>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the caller credential.
    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Add a transient entry.
    #[must_use]
    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }

    /// Fix the transaction clock.
    #[must_use]
    pub fn at(mut self, timestamp: TxTimestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Collect an endorsement from another organization.
    #[must_use]
    pub fn endorsed_by(mut self, org: impl Into<OrgId>) -> Self {
        self.endorsers.push(org.into());
        self
    }

    /// Fix the proposal nonce.
    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    fn into_proposal(self) -> (Proposal, String, Vec<String>) {
        let nonce = self
            .nonce
            .unwrap_or_else(|| Uuid::new_v4().as_bytes().to_vec());
        let timestamp = self.timestamp.unwrap_or_else(wall_clock);
        let tx_id = TxId::derive(&nonce, &self.credential.clone().unwrap_or_default());

        let mut proposal = match self.credential {
            Some(credential) => Proposal::new(tx_id, timestamp, credential),
            None => Proposal::without_creator(tx_id, timestamp),
        };
        for (key, value) in self.transient {
            proposal = proposal.with_transient(key, value);
        }
        for org in self.endorsers {
            proposal = proposal.endorsed_by(org);
        }
        (proposal, self.function, self.args)
    }
}

fn wall_clock() -> TxTimestamp {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    TxTimestamp::from_seconds(i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

/// Result of a committed submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResponse {
    /// Committed transaction id.
    pub tx_id: TxId,
    /// Function result.
    pub payload: Vec<u8>,
    /// Height the transaction committed at.
    pub block_height: u64,
    /// Notification committed with the transaction.
    pub notification: Option<Notification>,
}

impl InvocationResponse {
    /// Decode the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the payload is not a `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

/// Errors at the service boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The function failed during simulation. Nothing was committed.
    #[error("invocation failed: {0}")]
    Invocation(#[from] NotarizationError),

    /// The substrate rejected the commit.
    #[error("commit rejected: {0}")]
    Commit(SubstrateError),
}

impl ServiceError {
    /// Stable kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invocation(e) => e.kind(),
            Self::Commit(_) => ErrorKind::Substrate,
        }
    }

    /// Returns true if resubmitting under a new transaction id may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Commit(e) if e.is_retryable())
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// The notarization service.
pub struct NotarizationService<P: NotificationPublisher> {
    config: ServiceConfig,
    ledger: Arc<InMemoryLedger>,
    publisher: Arc<P>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<P: NotificationPublisher> NotarizationService<P> {
    /// Create a service over a ledger and a publisher.
    pub fn new(ledger: Arc<InMemoryLedger>, publisher: Arc<P>, config: ServiceConfig) -> Self {
        Self {
            config,
            ledger,
            publisher,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Create a service after validating its configuration.
    ///
    /// # Errors
    ///
    /// The first problem [`NotarizationConfig::validate`] reports.
    pub fn try_new(
        ledger: Arc<InMemoryLedger>,
        publisher: Arc<P>,
        config: ServiceConfig,
    ) -> Result<Self, ConfigError> {
        config.notarization.validate()?;
        info!(
            oversight = %config.notarization.oversight_org,
            reissue = config.notarization.allow_reissue,
            relay = config.relay_notifications,
            "Notarization service configured"
        );
        Ok(Self::new(ledger, publisher, config))
    }

    /// The ledger this service commits to.
    #[must_use]
    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    fn simulate_and_commit(
        &self,
        request: InvocationRequest,
    ) -> Result<(ContractFunction, Vec<u8>, CommitReceipt), ServiceError> {
        let (proposal, function, args) = request.into_proposal();
        let function = ContractFunction::parse(&function)?;

        let mut simulation = self.ledger.begin(proposal);
        let payload =
            dispatcher::dispatch(&mut simulation, &self.config.notarization, function, &args)?;
        let receipt = simulation.commit().map_err(ServiceError::Commit)?;
        Ok((function, payload, receipt))
    }

    fn simulate(
        &self,
        request: InvocationRequest,
    ) -> Result<(ContractFunction, Vec<u8>), ServiceError> {
        let (proposal, function, args) = request.into_proposal();
        let function = ContractFunction::parse(&function)?;

        let mut simulation = self.ledger.begin(proposal);
        let payload =
            dispatcher::dispatch(&mut simulation, &self.config.notarization, function, &args)?;
        Ok((function, payload))
    }

    async fn record_failure(&self, function: &str, err: &ServiceError) {
        let mut stats = self.stats.write().await;
        match err {
            ServiceError::Invocation(_) => stats.failed_invocations += 1,
            ServiceError::Commit(SubstrateError::MvccReadConflict { .. }) => {
                stats.commit_conflicts += 1;
                #[cfg(feature = "metrics")]
                metric_inc!(COMMIT_CONFLICTS);
            }
            ServiceError::Commit(_) => stats.rejected_commits += 1,
        }
        drop(stats);

        warn!(function = %function, kind = %err.kind(), error = %err, "Invocation failed");
        #[cfg(feature = "metrics")]
        notary_telemetry::record_invocation(function, err.kind().as_str());
    }

    async fn relay(&self, notification: &Notification) {
        if !self.config.relay_notifications {
            return;
        }
        let delivered = self.publisher.publish(notification.clone()).await;
        self.stats.write().await.notifications_relayed += 1;
        debug!(name = %notification.name, delivered, "Notification relayed");

        #[cfg(feature = "metrics")]
        metric_inc!(NOTIFICATIONS_PUBLISHED);
    }
}

#[async_trait]
impl<P: NotificationPublisher + 'static> NotarizationApi for NotarizationService<P> {
    #[instrument(skip(self, request), fields(function = %request.function))]
    async fn submit(&self, request: InvocationRequest) -> Result<InvocationResponse, ServiceError> {
        let function_name = request.function.clone();
        self.stats.write().await.submitted += 1;

        let (function, payload, receipt) = match self.simulate_and_commit(request) {
            Ok(done) => done,
            Err(err) => {
                self.record_failure(&function_name, &err).await;
                return Err(err);
            }
        };

        self.stats.write().await.committed += 1;
        info!(
            tx_id = %receipt.tx_id,
            function = %function,
            height = receipt.block_height,
            "Transaction committed"
        );

        #[cfg(feature = "metrics")]
        {
            notary_telemetry::record_invocation(function.name(), "ok");
            if !receipt.is_read_only() {
                match function {
                    ContractFunction::InstrumentIssue => metric_inc!(INSTRUMENTS_ISSUED),
                    ContractFunction::InstrumentRevoke => metric_inc!(INSTRUMENTS_REVOKED),
                    _ => {}
                }
            }
        }

        if let Some(notification) = &receipt.notification {
            self.relay(notification).await;
        }

        Ok(InvocationResponse {
            tx_id: receipt.tx_id,
            payload,
            block_height: receipt.block_height,
            notification: receipt.notification,
        })
    }

    #[instrument(skip(self, request), fields(function = %request.function))]
    async fn evaluate(&self, request: InvocationRequest) -> Result<Vec<u8>, ServiceError> {
        let function_name = request.function.clone();
        self.stats.write().await.evaluated += 1;

        match self.simulate(request) {
            Ok((function, payload)) => {
                if function.is_submit() {
                    info!(function = %function, "Evaluated a submit function; writes discarded");
                }
                #[cfg(feature = "metrics")]
                notary_telemetry::record_invocation(function.name(), "ok");
                Ok(payload)
            }
            Err(err) => {
                self.record_failure(&function_name, &err).await;
                Err(err)
            }
        }
    }

    fn contract_name(&self) -> &'static str {
        CONTRACT_NAME
    }
}
