//! # Shared Test Fixtures
//!
//! A service wired to a fresh ledger and bus, plus the credentials and
//! payloads the flows use.

use anyhow::Context;
use nl_01_ledger_substrate::InMemoryLedger;
use nl_02_notarization::prelude::*;
use notary_telemetry::{log_tx_event, TelemetryConfig};
use shared_bus::InMemoryEventBus;
use shared_types::entities::{Credential, TxTimestamp};
use std::sync::{Arc, Once};

/// 2024-01-01T00:00:00Z
pub const T0: i64 = 1_704_067_200;

/// Issuing organization used throughout.
pub const ISSUER: &str = "Org1MSP";

/// A second, unrelated organization.
pub const OTHER_ORG: &str = "Org2MSP";

/// Oversight organization of the default configuration.
pub const OVERSIGHT: &str = "MOJMSP";

static LOGGING: Once = Once::new();

/// Install a test subscriber and register metrics once per process.
/// Honors `NL_LOG_LEVEL`.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let config = TelemetryConfig {
            console_output: true,
            ..TelemetryConfig::for_component("tests")
        };
        // Another test binary may already own the global subscriber.
        let _ = notary_telemetry::init_telemetry(&config);
    });
}

/// Caller with the issuer role.
#[must_use]
pub fn notary(org: &str) -> Credential {
    Credential::new(org).with_attribute("role", "NOTARY")
}

/// Caller with the supervisor role.
#[must_use]
pub fn supervisor(org: &str) -> Credential {
    Credential::new(org).with_attribute("role", "SUPERVISOR")
}

/// Member of the oversight organization, without any role.
#[must_use]
pub fn oversight() -> Credential {
    Credential::new(OVERSIGHT)
}

/// Issue payload with the required fields and a few optional ones.
#[must_use]
pub fn issue_payload(id: &str, instrument_no: &str, content_hash: &str) -> String {
    serde_json::json!({
        "id": id,
        "caseId": format!("case-{id}"),
        "instrumentNo": instrument_no,
        "contentHash": content_hash,
        "jurisdictionCode": "HN-01",
        "sequenceNumber": 7,
        "parties": [{"id": "p-1", "role": "GRANTOR", "displayName": "A. Grantor"}],
    })
    .to_string()
}

/// Request builder at `T0 + offset` seconds.
#[must_use]
pub fn request<I, A>(function: &str, args: I, caller: Credential, offset: i64) -> InvocationRequest
where
    I: IntoIterator<Item = A>,
    A: Into<String>,
{
    InvocationRequest::new(function, args)
        .with_credential(caller)
        .at(TxTimestamp::from_seconds(T0 + offset))
}

/// A service wired to a fresh ledger and bus.
pub struct Harness {
    /// Reference ledger.
    pub ledger: Arc<InMemoryLedger>,
    /// Notification bus.
    pub bus: Arc<InMemoryEventBus>,
    /// Service under test.
    pub service: NotarizationService<InMemoryEventBus>,
}

impl Harness {
    /// Harness with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    /// Harness with a custom configuration.
    #[must_use]
    pub fn with_config(config: ServiceConfig) -> Self {
        init_test_logging();
        let ledger = Arc::new(InMemoryLedger::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let service = NotarizationService::try_new(Arc::clone(&ledger), Arc::clone(&bus), config)
            .expect("test configuration is valid");
        Self {
            ledger,
            bus,
            service,
        }
    }

    /// Issue `id` as a notary of [`ISSUER`] and return the committed record.
    pub async fn issue(&self, id: &str, extra_approval: bool) -> anyhow::Result<Instrument> {
        let response = self
            .service
            .submit(request(
                "InstrumentIssue",
                [
                    issue_payload(id, &format!("N-{id}"), "ABCDEF0123"),
                    extra_approval.to_string(),
                ],
                notary(ISSUER),
                0,
            ))
            .await
            .with_context(|| format!("issuing {id}"))?;
        log_tx_event!(debug, response.tx_id, "Fixture issue committed", id = %id);
        Ok(response.json()?)
    }

    /// Revoke `id` as `caller` and return the committed record.
    pub async fn revoke(
        &self,
        caller: Credential,
        id: &str,
        reason: &str,
        offset: i64,
    ) -> Result<Instrument, ServiceError> {
        let response = self
            .service
            .submit(request("InstrumentRevoke", [id, reason], caller, offset))
            .await?;
        log_tx_event!(debug, response.tx_id, "Fixture revoke committed", id = %id);
        response
            .json()
            .map_err(|e| ServiceError::Invocation(NotarizationError::Validation(e.to_string())))
    }

    /// Read `id` through an evaluate call.
    pub async fn get(&self, id: &str) -> anyhow::Result<Instrument> {
        let bytes = self
            .service
            .evaluate(request("InstrumentGet", [id], notary(OTHER_ORG), 0))
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
