//! # Instrument Lifecycle Manager
//!
//! Orchestrates every operation on an instrument. Each operation runs inside
//! one substrate transaction: it resolves the caller, checks authorization,
//! validates input, then buffers writes, the validation policy and the
//! notification. The substrate commits all of them or none.
//!
//! ## State Machine
//!
//! ```text
//! issue() ──→ ISSUED ──revoke()──→ REVOKED ──revoke()──→ REVOKED (no-op)
//! ```
//!
//! ## Storage Layout
//!
//! | Record | Location |
//! |--------|----------|
//! | Instrument | public key `INS\|<id>` |
//! | Validation policy | validation parameter of `INS\|<id>` |
//! | Index entry | composite key `instrument~no` over `[lowercase(no), id]` |
//! | Private record | `PII\|<caseId>` in `_implicit_org_<MSP>` |

use crate::authorization::{AuthorizationEngine, RevocationPath};
use crate::config::NotarizationConfig;
use crate::domain::{
    check_immutable_fields, check_key_component, check_transition, HistoryEntry, Instrument,
    InstrumentStatus, IssuePayload, VerificationResult,
};
use crate::errors::{NotarizationError, NotarizationResult};
use crate::events::{self, topics, InstrumentIssuedPayload, InstrumentRevokedPayload};
use crate::identity::{resolve_caller, CallerIdentity};
use crate::index;
use nl_01_ledger_substrate::ports::{implicit_collection_for, ChaincodeStub};
use tracing::{debug, info, instrument, warn};

/// Prefix of instrument keys.
pub const INSTRUMENT_KEY_PREFIX: &str = "INS|";

/// Prefix of private record keys.
pub const PRIVATE_KEY_PREFIX: &str = "PII|";

/// Public storage key of an instrument.
#[must_use]
pub fn instrument_key(id: &str) -> String {
    format!("{INSTRUMENT_KEY_PREFIX}{id}")
}

/// Private storage key of a case's record.
#[must_use]
pub fn private_record_key(case_id: &str) -> String {
    format!("{PRIVATE_KEY_PREFIX}{case_id}")
}

/// The lifecycle operations for one configuration.
///
/// Holds no state between invocations; every call rehydrates from the stub.
#[derive(Debug, Clone, Copy)]
pub struct InstrumentLifecycle<'a> {
    config: &'a NotarizationConfig,
}

impl<'a> InstrumentLifecycle<'a> {
    /// Create a lifecycle over a configuration.
    #[must_use]
    pub fn new(config: &'a NotarizationConfig) -> Self {
        Self { config }
    }

    fn engine(&self) -> AuthorizationEngine<'a> {
        AuthorizationEngine::new(self.config)
    }

    fn caller<S>(&self, stub: &S) -> NotarizationResult<CallerIdentity>
    where
        S: ChaincodeStub + ?Sized,
    {
        resolve_caller(stub, &self.config.role_attribute)
    }

    // =========================================================================
    // PRIVATE RECORDS
    // =========================================================================

    /// Store the transient blob in the caller organization's private
    /// partition under `PII|<case_id>`. No role is required.
    ///
    /// # Errors
    ///
    /// - `Identity` - caller unresolvable
    /// - `Validation` - empty or malformed `case_id`
    /// - `MissingPayload` - transient entry absent or empty
    #[instrument(skip(self, stub))]
    pub fn put_private_record<S>(&self, stub: &mut S, case_id: &str) -> NotarizationResult<()>
    where
        S: ChaincodeStub + ?Sized,
    {
        let caller = self.caller(stub)?;
        check_key_component("caseId", case_id)?;

        let transient_key = &self.config.private_transient_key;
        let blob = match stub.transient(transient_key) {
            Some(bytes) if !bytes.is_empty() => bytes.to_vec(),
            _ => return Err(NotarizationError::MissingPayload(transient_key.clone())),
        };

        let collection = implicit_collection_for(&caller.organization);
        stub.put_private_data(&collection, &private_record_key(case_id), blob)?;

        info!(org = %caller.organization, "Private record stored");
        Ok(())
    }

    /// Read a private record from the caller organization's own partition.
    ///
    /// # Errors
    ///
    /// - `Identity` - caller unresolvable
    /// - `Validation` - empty or malformed `case_id`
    /// - `NotFound` - no record for the case
    #[instrument(skip(self, stub))]
    pub fn get_private_record<S>(&self, stub: &mut S, case_id: &str) -> NotarizationResult<Vec<u8>>
    where
        S: ChaincodeStub + ?Sized,
    {
        let caller = self.caller(stub)?;
        check_key_component("caseId", case_id)?;

        let collection = implicit_collection_for(&caller.organization);
        stub.get_private_data(&collection, &private_record_key(case_id))?
            .ok_or_else(|| NotarizationError::NotFound {
                entity: "private record",
                id: case_id.to_string(),
            })
    }

    // =========================================================================
    // ISSUE
    // =========================================================================

    /// Issue a new instrument.
    ///
    /// Requires the issuer role. Installs a validation policy requiring the
    /// issuing organization, plus the oversight organization when
    /// `require_extra_approval` is set.
    ///
    /// # Errors
    ///
    /// - `Identity` - caller unresolvable
    /// - `Authorization` - caller lacks the issuer role
    /// - `Validation` - payload does not decode, required fields are empty,
    ///   or the id is already issued and revoked
    /// - `AlreadyExists` - the id is already issued and reissue is disabled
    #[instrument(skip(self, stub, payload_json), fields(tx_id = %stub.tx_id()))]
    pub fn issue<S>(
        &self,
        stub: &mut S,
        payload_json: &str,
        require_extra_approval: bool,
    ) -> NotarizationResult<Instrument>
    where
        S: ChaincodeStub + ?Sized,
    {
        let caller = self.caller(stub)?;
        let engine = self.engine();
        engine.require_role(&caller, &[self.config.issuer_role.as_str()])?;

        let payload: IssuePayload = serde_json::from_str(payload_json)
            .map_err(|e| NotarizationError::Validation(format!("invalid payload: {e}")))?;
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(NotarizationError::MissingFields(missing));
        }
        index::index_key(&payload.instrument_no, &payload.id)?;

        let key = instrument_key(&payload.id);
        if let Some(existing) = self.load(stub, &key)? {
            self.check_reissue(&existing)?;
        }

        let issued_at = stub.tx_timestamp().to_rfc3339()?;
        let instrument = Instrument::issue(payload, caller.organization.clone(), issued_at);

        stub.put_state(&key, encode(&instrument)?)?;
        index::add_index_entry(stub, &instrument.instrument_no, &instrument.id)?;

        let policy = engine.issuance_policy(&instrument.issuing_organization, require_extra_approval);
        stub.set_state_validation_parameter(&key, policy.to_bytes()?)?;

        events::emit(
            stub,
            topics::INSTRUMENT_ISSUED,
            &InstrumentIssuedPayload {
                id: instrument.id.clone(),
                instrument_no: instrument.instrument_no.clone(),
                issuing_organization: instrument.issuing_organization.clone(),
                issued_at: instrument.issued_at.clone(),
            },
        )?;

        info!(
            id = %instrument.id,
            org = %instrument.issuing_organization,
            extra_approval = require_extra_approval,
            "Instrument issued"
        );
        Ok(instrument)
    }

    fn check_reissue(&self, existing: &Instrument) -> NotarizationResult<()> {
        if !self.config.allow_reissue {
            warn!(id = %existing.id, "Duplicate instrument id");
            return Err(NotarizationError::AlreadyExists(existing.id.clone()));
        }
        if existing.status != InstrumentStatus::Issued {
            return Err(NotarizationError::InvalidTransition {
                from: existing.status.to_string(),
                to: InstrumentStatus::Issued.to_string(),
            });
        }
        debug!(id = %existing.id, "Reissuing instrument");
        Ok(())
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Read an instrument.
    ///
    /// # Errors
    ///
    /// - `Identity` - caller unresolvable
    /// - `NotFound` - no instrument with this id
    /// - `CorruptState` - stored bytes do not decode
    #[instrument(skip(self, stub))]
    pub fn get<S>(&self, stub: &mut S, id: &str) -> NotarizationResult<Instrument>
    where
        S: ChaincodeStub + ?Sized,
    {
        self.caller(stub)?;
        self.require(stub, id)
    }

    /// Compare a candidate hash with the stored content hash, ignoring case.
    /// A mismatch is reported in the result, never as an error.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    #[instrument(skip(self, stub, candidate_hash))]
    pub fn verify<S>(
        &self,
        stub: &mut S,
        id: &str,
        candidate_hash: &str,
    ) -> NotarizationResult<VerificationResult>
    where
        S: ChaincodeStub + ?Sized,
    {
        let instrument = self.get(stub, id)?;
        let result = instrument.verification(candidate_hash);
        debug!(id = %id, hash_match = result.hash_match, "Instrument verified");
        Ok(result)
    }

    /// Every committed modification of an instrument, oldest first.
    ///
    /// # Errors
    ///
    /// - `Identity` - caller unresolvable
    /// - `Validation` - malformed id
    /// - `NotFound` - the instrument was never written
    /// - `CorruptState` - a stored version does not decode
    #[instrument(skip(self, stub))]
    pub fn history<S>(&self, stub: &mut S, id: &str) -> NotarizationResult<Vec<HistoryEntry>>
    where
        S: ChaincodeStub + ?Sized,
    {
        self.caller(stub)?;
        check_key_component("id", id)?;

        let modifications = stub.get_history_for_key(&instrument_key(id))?;
        if modifications.is_empty() {
            return Err(NotarizationError::instrument_not_found(id));
        }

        let key = instrument_key(id);
        modifications
            .into_iter()
            .map(|m| {
                let status = match m.value.as_deref() {
                    Some(bytes) => serde_json::from_slice::<Instrument>(bytes)
                        .map_err(|e| NotarizationError::CorruptState {
                            key: key.clone(),
                            reason: format!("history entry {}: {e}", m.tx_id.0),
                        })?
                        .status
                        .to_string(),
                    None => String::new(),
                };
                Ok(HistoryEntry {
                    tx_id: m.tx_id.0,
                    timestamp: m.timestamp.seconds,
                    is_delete: m.is_delete,
                    status,
                })
            })
            .collect()
    }

    /// Every instrument carrying `instrument_no`, ignoring case, in id order.
    /// No match is an empty list.
    ///
    /// # Errors
    ///
    /// - `Identity` - caller unresolvable
    /// - `Validation` - empty or malformed number
    /// - `CorruptState` - an index entry points at a missing or undecodable record
    #[instrument(skip(self, stub))]
    pub fn find_by_instrument_no<S>(
        &self,
        stub: &mut S,
        instrument_no: &str,
    ) -> NotarizationResult<Vec<Instrument>>
    where
        S: ChaincodeStub + ?Sized,
    {
        self.caller(stub)?;

        let wanted = instrument_no.to_lowercase();
        let mut found = Vec::new();
        for id in index::lookup_ids(stub, instrument_no)? {
            let key = instrument_key(&id);
            let instrument =
                self.load(stub, &key)?
                    .ok_or_else(|| NotarizationError::CorruptState {
                        key,
                        reason: "index entry without instrument".to_string(),
                    })?;
            // Entries are never removed, so a reissue under a new number leaves a stale one.
            if instrument.instrument_no.to_lowercase() == wanted {
                found.push(instrument);
            } else {
                debug!(id = %instrument.id, "Skipping stale index entry");
            }
        }
        Ok(found)
    }

    // =========================================================================
    // REVOKE
    // =========================================================================

    /// Revoke an instrument.
    ///
    /// Oversight callers may revoke any instrument; everyone else needs the
    /// supervisor role and membership in the issuing organization. Revoking
    /// a revoked instrument returns it unchanged and writes nothing.
    /// Otherwise the record is replaced, its policy becomes issuer plus
    /// oversight, and `instrument.revoked` is attached.
    ///
    /// # Errors
    ///
    /// - `Identity` - caller unresolvable
    /// - `Authorization` - neither revocation path applies
    /// - `NotFound` / `CorruptState` - as for [`get`](Self::get)
    /// - `Validation` - the stored status cannot be revoked
    #[instrument(skip(self, stub, reason), fields(tx_id = %stub.tx_id()))]
    pub fn revoke<S>(&self, stub: &mut S, id: &str, reason: &str) -> NotarizationResult<Instrument>
    where
        S: ChaincodeStub + ?Sized,
    {
        let caller = self.caller(stub)?;
        let engine = self.engine();
        engine.revocation_path(&caller)?;

        let current = self.require(stub, id)?;
        let path = engine.authorize_revocation(&caller, &current.issuing_organization)?;

        if current.status == InstrumentStatus::Revoked {
            debug!(id = %id, "Instrument already revoked");
            return Ok(current);
        }
        check_transition(&current.status, &InstrumentStatus::Revoked)?;

        let mut revoked = current.clone();
        revoked.mark_revoked(stub.tx_timestamp().to_rfc3339()?, reason);
        if !check_immutable_fields(&current, &revoked) {
            return Err(NotarizationError::Validation(
                "immutable fields changed during revocation".to_string(),
            ));
        }

        let key = instrument_key(id);
        stub.put_state(&key, encode(&revoked)?)?;

        let policy = engine.revocation_policy(&revoked.issuing_organization);
        stub.set_state_validation_parameter(&key, policy.to_bytes()?)?;

        events::emit(
            stub,
            topics::INSTRUMENT_REVOKED,
            &InstrumentRevokedPayload {
                id: revoked.id.clone(),
                reason: reason.to_string(),
            },
        )?;

        info!(
            id = %id,
            by = %caller.organization,
            oversight = path == RevocationPath::Oversight,
            "Instrument revoked"
        );
        Ok(revoked)
    }

    // =========================================================================
    // STORAGE HELPERS
    // =========================================================================

    fn load<S>(&self, stub: &mut S, key: &str) -> NotarizationResult<Option<Instrument>>
    where
        S: ChaincodeStub + ?Sized,
    {
        let Some(bytes) = stub.get_state(key)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| NotarizationError::CorruptState {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn require<S>(&self, stub: &mut S, id: &str) -> NotarizationResult<Instrument>
    where
        S: ChaincodeStub + ?Sized,
    {
        check_key_component("id", id)?;
        self.load(stub, &instrument_key(id))?
            .ok_or_else(|| NotarizationError::instrument_not_found(id))
    }
}

fn encode(instrument: &Instrument) -> NotarizationResult<Vec<u8>> {
    serde_json::to_vec(instrument).map_err(|e| NotarizationError::CorruptState {
        key: instrument_key(&instrument.id),
        reason: e.to_string(),
    })
}
