//! # In-Memory Reference Ledger
//!
//! A single-process ledger implementing the substrate contract with the
//! execute-then-validate model:
//!
//! 1. [`InMemoryLedger::begin`] opens a [`TxSimulation`] for a [`Proposal`].
//!    Chaincode runs against it, reading committed state and buffering writes.
//! 2. The simulation yields a [`ReadWriteSet`].
//! 3. [`InMemoryLedger::commit`] validates the set and applies it atomically,
//!    or rejects it and changes nothing.
//!
//! ## Commit Validation Order
//!
//! | Step | Check | Error |
//! |------|-------|-------|
//! | 1 | transaction id not seen before | `DuplicateTxId` |
//! | 2 | at least one endorsing organization | `NoEndorsements` |
//! | 3 | every key read still has the version seen | `MvccReadConflict` |
//! | 4 | every key written satisfies its validation parameter | `EndorsementPolicyFailure` |
//!
//! Reads never observe the transaction's own buffered writes.

use crate::domain::{
    partial_key_range, validate_state_key, CommitReceipt, KeyModification, Version,
};
use crate::ports::{implicit_collection_owner, PrivatePartitionStore, RecordStore, TransactionContext};
use parking_lot::RwLock;
use shared_types::entities::{Credential, Notification, OrgId, TxId, TxTimestamp};
use shared_types::errors::SubstrateError;
use shared_types::policy::EndorsementPolicy;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Reference ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Policy applied to written keys that carry no validation parameter.
    /// `None` accepts any non-empty endorsement set.
    pub default_policy: Option<EndorsementPolicy>,
    /// Whether to keep per-key modification history.
    pub record_history: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_policy: None,
            record_history: true,
        }
    }
}

impl LedgerConfig {
    /// Sets the fallback endorsement policy.
    #[must_use]
    pub fn with_default_policy(mut self, policy: EndorsementPolicy) -> Self {
        self.default_policy = Some(policy);
        self
    }
}

// =============================================================================
// PROPOSALS
// =============================================================================

/// A signed transaction proposal as received from a client.
#[derive(Debug, Clone)]
pub struct Proposal {
    tx_id: TxId,
    timestamp: TxTimestamp,
    creator: Option<Credential>,
    transient: BTreeMap<String, Vec<u8>>,
    endorsers: BTreeSet<OrgId>,
}

impl Proposal {
    /// Creates a proposal endorsed by the creator's own organization.
    #[must_use]
    pub fn new(tx_id: TxId, timestamp: TxTimestamp, creator: Credential) -> Self {
        let mut endorsers = BTreeSet::new();
        endorsers.insert(OrgId::new(creator.msp_id.clone()));
        Self {
            tx_id,
            timestamp,
            creator: Some(creator),
            transient: BTreeMap::new(),
            endorsers,
        }
    }

    /// Creates a proposal whose creator identity could not be established.
    #[must_use]
    pub fn without_creator(tx_id: TxId, timestamp: TxTimestamp) -> Self {
        Self {
            tx_id,
            timestamp,
            creator: None,
            transient: BTreeMap::new(),
            endorsers: BTreeSet::new(),
        }
    }

    /// Adds a transient entry.
    #[must_use]
    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }

    /// Adds an endorsing organization.
    #[must_use]
    pub fn endorsed_by(mut self, org: impl Into<OrgId>) -> Self {
        self.endorsers.insert(org.into());
        self
    }

    /// Replaces the endorsing organizations.
    #[must_use]
    pub fn with_endorsers<I>(mut self, orgs: I) -> Self
    where
        I: IntoIterator<Item = OrgId>,
    {
        self.endorsers = orgs.into_iter().collect();
        self
    }

    /// Transaction id.
    #[must_use]
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// Transaction clock.
    #[must_use]
    pub fn timestamp(&self) -> TxTimestamp {
        self.timestamp
    }

    /// Endorsing organizations.
    #[must_use]
    pub fn endorsers(&self) -> &BTreeSet<OrgId> {
        &self.endorsers
    }

    /// Organization of the peer simulating the proposal, which is the
    /// creator's organization.
    #[must_use]
    pub fn peer_org(&self) -> Option<OrgId> {
        self.creator.as_ref().map(|c| OrgId::new(c.msp_id.clone()))
    }
}

// =============================================================================
// READ-WRITE SET
// =============================================================================

type PrivateKey = (String, String);

#[derive(Debug, Clone, PartialEq, Eq)]
struct RangeRead {
    start: String,
    end: String,
    results: Vec<(String, Version)>,
}

/// Simulation result submitted for commit.
#[derive(Debug, Clone)]
pub struct ReadWriteSet {
    tx_id: TxId,
    timestamp: TxTimestamp,
    endorsers: BTreeSet<OrgId>,
    reads: BTreeMap<String, Option<Version>>,
    range_reads: Vec<RangeRead>,
    private_reads: BTreeMap<PrivateKey, Option<Version>>,
    writes: BTreeMap<String, Vec<u8>>,
    parameter_writes: BTreeMap<String, Vec<u8>>,
    private_writes: BTreeMap<PrivateKey, Vec<u8>>,
    event: Option<Notification>,
}

impl ReadWriteSet {
    fn new(proposal: &Proposal) -> Self {
        Self {
            tx_id: proposal.tx_id.clone(),
            timestamp: proposal.timestamp,
            endorsers: proposal.endorsers.clone(),
            reads: BTreeMap::new(),
            range_reads: Vec::new(),
            private_reads: BTreeMap::new(),
            writes: BTreeMap::new(),
            parameter_writes: BTreeMap::new(),
            private_writes: BTreeMap::new(),
            event: None,
        }
    }

    /// Transaction id.
    #[must_use]
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// Returns true if nothing would change on commit.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
            && self.parameter_writes.is_empty()
            && self.private_writes.is_empty()
            && self.event.is_none()
    }

    /// Public keys read during simulation.
    pub fn read_keys(&self) -> impl Iterator<Item = &str> {
        self.reads.keys().map(String::as_str)
    }

    /// Public keys whose value or validation parameter would change.
    #[must_use]
    pub fn written_keys(&self) -> BTreeSet<&str> {
        self.writes
            .keys()
            .chain(self.parameter_writes.keys())
            .map(String::as_str)
            .collect()
    }

    /// Buffered value write for a key.
    #[must_use]
    pub fn pending_write(&self, key: &str) -> Option<&[u8]> {
        self.writes.get(key).map(Vec::as_slice)
    }

    /// Buffered validation parameter for a key.
    #[must_use]
    pub fn pending_parameter(&self, key: &str) -> Option<&[u8]> {
        self.parameter_writes.get(key).map(Vec::as_slice)
    }

    /// Notification attached by the simulation.
    #[must_use]
    pub fn event(&self) -> Option<&Notification> {
        self.event.as_ref()
    }
}

// =============================================================================
// LEDGER STATE
// =============================================================================

#[derive(Debug, Clone)]
struct StateEntry {
    value: Option<Vec<u8>>,
    validation_parameter: Option<Vec<u8>>,
    version: Version,
}

#[derive(Debug, Clone)]
struct PrivateEntry {
    value: Vec<u8>,
    version: Version,
}

#[derive(Debug, Default)]
struct LedgerState {
    world: BTreeMap<String, StateEntry>,
    history: HashMap<String, Vec<KeyModification>>,
    private: HashMap<String, BTreeMap<String, PrivateEntry>>,
    seen_tx_ids: HashSet<TxId>,
    notifications: Vec<Notification>,
    height: u64,
}

impl LedgerState {
    fn version_of(&self, key: &str) -> Option<Version> {
        self.world.get(key).map(|e| e.version)
    }

    fn private_version_of(&self, collection: &str, key: &str) -> Option<Version> {
        self.private
            .get(collection)
            .and_then(|c| c.get(key))
            .map(|e| e.version)
    }

    fn range(&self, start: &str, end: &str) -> Vec<(String, Vec<u8>, Version)> {
        self.world
            .range::<str, _>((
                std::ops::Bound::Included(start),
                std::ops::Bound::Excluded(end),
            ))
            .filter_map(|(k, e)| e.value.as_ref().map(|v| (k.clone(), v.clone(), e.version)))
            .collect()
    }
}

/// In-memory reference ledger.
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
    config: LedgerConfig,
}

impl InMemoryLedger {
    /// Create an empty ledger with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create an empty ledger.
    #[must_use]
    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            config,
        }
    }

    /// Ledger configuration.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Open a simulation for a proposal.
    #[must_use]
    pub fn begin(&self, proposal: Proposal) -> TxSimulation<'_> {
        let rwset = ReadWriteSet::new(&proposal);
        TxSimulation {
            ledger: self,
            proposal,
            rwset,
        }
    }

    /// Validate and apply a simulation result.
    ///
    /// The transaction id is consumed even when validation fails, so a
    /// rejected invocation must be resubmitted under a new id.
    ///
    /// # Errors
    ///
    /// See the validation table in the module docs. On error nothing is
    /// applied.
    pub fn commit(&self, rwset: ReadWriteSet) -> Result<CommitReceipt, SubstrateError> {
        let mut state = self.state.write();

        if !state.seen_tx_ids.insert(rwset.tx_id.clone()) {
            warn!(tx_id = %rwset.tx_id, "Rejected duplicate transaction id");
            return Err(SubstrateError::DuplicateTxId(rwset.tx_id));
        }

        if rwset.endorsers.is_empty() {
            warn!(tx_id = %rwset.tx_id, "Rejected transaction without endorsements");
            return Err(SubstrateError::NoEndorsements(rwset.tx_id));
        }

        Self::validate_reads(&state, &rwset)?;
        self.validate_endorsements(&state, &rwset)?;

        Ok(self.apply(&mut state, rwset))
    }

    fn validate_reads(state: &LedgerState, rwset: &ReadWriteSet) -> Result<(), SubstrateError> {
        let conflict = |key: &str| {
            debug!(tx_id = %rwset.tx_id, key = %key, "MVCC read conflict");
            SubstrateError::MvccReadConflict {
                key: key.to_string(),
            }
        };

        for (key, seen) in &rwset.reads {
            if state.version_of(key) != *seen {
                return Err(conflict(key));
            }
        }

        for range in &rwset.range_reads {
            let current: Vec<(String, Version)> = state
                .range(&range.start, &range.end)
                .into_iter()
                .map(|(k, _, v)| (k, v))
                .collect();
            if current != range.results {
                return Err(conflict(&range.start));
            }
        }

        for ((collection, key), seen) in &rwset.private_reads {
            if state.private_version_of(collection, key) != *seen {
                return Err(conflict(&format!("{collection}/{key}")));
            }
        }

        Ok(())
    }

    fn validate_endorsements(
        &self,
        state: &LedgerState,
        rwset: &ReadWriteSet,
    ) -> Result<(), SubstrateError> {
        for key in rwset.written_keys() {
            let policy = match state
                .world
                .get(key)
                .and_then(|e| e.validation_parameter.as_deref())
            {
                Some(bytes) => Some(EndorsementPolicy::from_bytes(bytes)?),
                None => self.config.default_policy.clone(),
            };

            let Some(policy) = policy else { continue };
            if !policy.is_satisfied_by(&rwset.endorsers) {
                let missing = policy.missing_from(&rwset.endorsers);
                warn!(
                    tx_id = %rwset.tx_id,
                    key = %key,
                    missing = ?missing,
                    "Endorsement policy not satisfied"
                );
                return Err(SubstrateError::EndorsementPolicyFailure {
                    key: key.to_string(),
                    missing,
                });
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut LedgerState, rwset: ReadWriteSet) -> CommitReceipt {
        state.height += 1;
        let version = Version::new(state.height, 0);
        let keys_written = rwset.written_keys().len();
        let private_writes = rwset.private_writes.len();

        for (key, value) in rwset.writes {
            if self.config.record_history {
                state
                    .history
                    .entry(key.clone())
                    .or_default()
                    .push(KeyModification {
                        tx_id: rwset.tx_id.clone(),
                        timestamp: rwset.timestamp,
                        value: Some(value.clone()),
                        is_delete: false,
                    });
            }
            let entry = state.world.entry(key).or_insert(StateEntry {
                value: None,
                validation_parameter: None,
                version,
            });
            entry.value = Some(value);
            entry.version = version;
        }

        for (key, parameter) in rwset.parameter_writes {
            let entry = state.world.entry(key).or_insert(StateEntry {
                value: None,
                validation_parameter: None,
                version,
            });
            entry.validation_parameter = Some(parameter);
            entry.version = version;
        }

        for ((collection, key), value) in rwset.private_writes {
            state
                .private
                .entry(collection)
                .or_default()
                .insert(key, PrivateEntry { value, version });
        }

        if let Some(notification) = &rwset.event {
            state.notifications.push(notification.clone());
        }

        debug!(
            tx_id = %rwset.tx_id,
            height = state.height,
            keys_written,
            private_writes,
            "Transaction committed"
        );

        CommitReceipt {
            tx_id: rwset.tx_id,
            block_height: state.height,
            keys_written,
            private_writes,
            notification: rwset.event,
        }
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Height of the last committed block.
    #[must_use]
    pub fn block_height(&self) -> u64 {
        self.state.read().height
    }

    /// Committed value of a public key.
    #[must_use]
    pub fn committed_state(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().world.get(key).and_then(|e| e.value.clone())
    }

    /// Committed validation parameter of a public key.
    #[must_use]
    pub fn validation_parameter(&self, key: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .world
            .get(key)
            .and_then(|e| e.validation_parameter.clone())
    }

    /// Version of a public key.
    #[must_use]
    pub fn key_version(&self, key: &str) -> Option<Version> {
        self.state.read().version_of(key)
    }

    /// Committed modifications of a public key, oldest first.
    #[must_use]
    pub fn history(&self, key: &str) -> Vec<KeyModification> {
        self.state.read().history.get(key).cloned().unwrap_or_default()
    }

    /// Every public key holding a value, in key order.
    #[must_use]
    pub fn public_keys(&self) -> Vec<String> {
        self.state
            .read()
            .world
            .iter()
            .filter(|(_, e)| e.value.is_some())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Administrative view of a private entry, bypassing collection
    /// membership.
    #[must_use]
    pub fn private_data(&self, collection: &str, key: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .private
            .get(collection)
            .and_then(|c| c.get(key))
            .map(|e| e.value.clone())
    }

    /// Every notification committed so far, in commit order.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.read().notifications.clone()
    }

    /// Returns true if a transaction id has reached commit validation.
    #[must_use]
    pub fn has_seen(&self, tx_id: &TxId) -> bool {
        self.state.read().seen_tx_ids.contains(tx_id)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SIMULATION
// =============================================================================

/// A transaction being simulated against an [`InMemoryLedger`].
pub struct TxSimulation<'a> {
    ledger: &'a InMemoryLedger,
    proposal: Proposal,
    rwset: ReadWriteSet,
}

impl TxSimulation<'_> {
    /// Proposal under simulation.
    #[must_use]
    pub fn proposal(&self) -> &Proposal {
        &self.proposal
    }

    /// Read-write set accumulated so far.
    #[must_use]
    pub fn read_write_set(&self) -> &ReadWriteSet {
        &self.rwset
    }

    /// End the simulation, returning its read-write set.
    #[must_use]
    pub fn into_read_write_set(self) -> ReadWriteSet {
        self.rwset
    }

    /// End the simulation and submit it for commit.
    ///
    /// # Errors
    ///
    /// See [`InMemoryLedger::commit`].
    pub fn commit(self) -> Result<CommitReceipt, SubstrateError> {
        let ledger = self.ledger;
        ledger.commit(self.rwset)
    }

    fn reject_empty(key: &str, value: &[u8]) -> Result<(), SubstrateError> {
        if value.is_empty() {
            return Err(SubstrateError::EmptyValue {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn validate_collection(collection: &str) -> Result<(), SubstrateError> {
        if collection.is_empty() {
            return Err(SubstrateError::InvalidKey {
                key: collection.to_string(),
                reason: "collection name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordStore for TxSimulation<'_> {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, SubstrateError> {
        validate_state_key(key)?;
        let state = self.ledger.state.read();
        let entry = state.world.get(key);
        self.rwset
            .reads
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|e| e.version));
        debug!(key = %key, found = entry.is_some_and(|e| e.value.is_some()), "get_state");
        Ok(entry.and_then(|e| e.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), SubstrateError> {
        validate_state_key(key)?;
        Self::reject_empty(key, &value)?;
        debug!(key = %key, bytes = value.len(), "put_state");
        self.rwset.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<Vec<(String, Vec<u8>)>, SubstrateError> {
        let (start, end) = partial_key_range(object_type, attributes)?;
        let rows = self.ledger.state.read().range(&start, &end);

        self.rwset.range_reads.push(RangeRead {
            start,
            end,
            results: rows.iter().map(|(k, _, v)| (k.clone(), *v)).collect(),
        });
        debug!(object_type = %object_type, rows = rows.len(), "partial composite key query");

        Ok(rows.into_iter().map(|(k, value, _)| (k, value)).collect())
    }

    fn get_history_for_key(&mut self, key: &str) -> Result<Vec<KeyModification>, SubstrateError> {
        validate_state_key(key)?;
        Ok(self.ledger.history(key))
    }

    fn get_state_validation_parameter(
        &mut self,
        key: &str,
    ) -> Result<Option<Vec<u8>>, SubstrateError> {
        validate_state_key(key)?;
        let state = self.ledger.state.read();
        let entry = state.world.get(key);
        self.rwset
            .reads
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|e| e.version));
        Ok(entry.and_then(|e| e.validation_parameter.clone()))
    }

    fn set_state_validation_parameter(
        &mut self,
        key: &str,
        parameter: Vec<u8>,
    ) -> Result<(), SubstrateError> {
        validate_state_key(key)?;
        Self::reject_empty(key, &parameter)?;
        self.rwset.parameter_writes.insert(key.to_string(), parameter);
        Ok(())
    }
}

impl PrivatePartitionStore for TxSimulation<'_> {
    fn get_private_data(
        &mut self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, SubstrateError> {
        Self::validate_collection(collection)?;
        validate_state_key(key)?;

        if let Some(owner) = implicit_collection_owner(collection) {
            let peer = self.proposal.peer_org().ok_or_else(|| {
                SubstrateError::IdentityUnavailable("proposal carries no creator".to_string())
            })?;
            if owner != peer {
                warn!(collection = %collection, org = %peer, "Private collection read denied");
                return Err(SubstrateError::PrivateDataAccessDenied {
                    collection: collection.to_string(),
                    org: peer,
                });
            }
        }

        let state = self.ledger.state.read();
        let entry = state.private.get(collection).and_then(|c| c.get(key));
        self.rwset
            .private_reads
            .entry((collection.to_string(), key.to_string()))
            .or_insert_with(|| entry.map(|e| e.version));
        Ok(entry.map(|e| e.value.clone()))
    }

    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), SubstrateError> {
        Self::validate_collection(collection)?;
        validate_state_key(key)?;
        Self::reject_empty(key, &value)?;
        debug!(collection = %collection, bytes = value.len(), "put_private_data");
        self.rwset
            .private_writes
            .insert((collection.to_string(), key.to_string()), value);
        Ok(())
    }
}

impl TransactionContext for TxSimulation<'_> {
    fn tx_id(&self) -> &TxId {
        &self.proposal.tx_id
    }

    fn tx_timestamp(&self) -> TxTimestamp {
        self.proposal.timestamp
    }

    fn creator(&self) -> Result<&Credential, SubstrateError> {
        self.proposal.creator.as_ref().ok_or_else(|| {
            SubstrateError::IdentityUnavailable("proposal carries no creator".to_string())
        })
    }

    fn transient(&self, key: &str) -> Option<&[u8]> {
        self.proposal.transient.get(key).map(Vec::as_slice)
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), SubstrateError> {
        if name.is_empty() {
            return Err(SubstrateError::InvalidKey {
                key: name.to_string(),
                reason: "event name must not be empty".to_string(),
            });
        }
        self.rwset.event = Some(Notification::new(
            name,
            self.proposal.tx_id.clone(),
            payload,
        ));
        Ok(())
    }
}
