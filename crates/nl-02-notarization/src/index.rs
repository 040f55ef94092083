//! # Secondary Index
//!
//! `instrumentNo -> id` lookup. Entries are composite keys over the
//! lowercased number and the id, so several instruments may share a number
//! and lookups ignore case. Entries are append-only.

use crate::domain::check_key_component;
use crate::errors::{NotarizationError, NotarizationResult};
use nl_01_ledger_substrate::domain::{create_composite_key, split_composite_key};
use nl_01_ledger_substrate::ports::RecordStore;

/// Object type of index entries.
pub const INSTRUMENT_NO_INDEX: &str = "instrument~no";

/// Value stored under every index entry.
pub const INDEX_ENTRY_VALUE: [u8; 1] = [0];

fn normalize(instrument_no: &str) -> String {
    instrument_no.to_lowercase()
}

/// Composite key of an index entry.
///
/// # Errors
///
/// `Validation` if either component is empty or contains reserved
/// characters.
pub fn index_key(instrument_no: &str, id: &str) -> NotarizationResult<String> {
    check_key_component("instrumentNo", instrument_no)?;
    check_key_component("id", id)?;
    Ok(create_composite_key(
        INSTRUMENT_NO_INDEX,
        &[&normalize(instrument_no), id],
    )?)
}

/// Record that `id` carries `instrument_no`.
///
/// # Errors
///
/// Key construction or substrate write failures.
pub fn add_index_entry<S>(stub: &mut S, instrument_no: &str, id: &str) -> NotarizationResult<()>
where
    S: RecordStore + ?Sized,
{
    let key = index_key(instrument_no, id)?;
    stub.put_state(&key, INDEX_ENTRY_VALUE.to_vec())?;
    Ok(())
}

/// Ids of every instrument carrying `instrument_no`, ignoring case, in id
/// order.
///
/// # Errors
///
/// - `Validation` - empty or malformed number
/// - `CorruptState` - an entry under the index prefix does not split
pub fn lookup_ids<S>(stub: &mut S, instrument_no: &str) -> NotarizationResult<Vec<String>>
where
    S: RecordStore + ?Sized,
{
    check_key_component("instrumentNo", instrument_no)?;
    let normalized = normalize(instrument_no);
    let rows = stub.get_state_by_partial_composite_key(INSTRUMENT_NO_INDEX, &[&normalized])?;

    let mut ids = rows
        .into_iter()
        .map(|(key, _)| {
            let (_, attributes) = split_composite_key(&key).map_err(|e| corrupt(&key, &e.to_string()))?;
            match attributes.as_slice() {
                [_, id] => Ok(id.clone()),
                _ => Err(corrupt(&key, "index entry must have two attributes")),
            }
        })
        .collect::<NotarizationResult<Vec<_>>>()?;

    ids.sort();
    Ok(ids)
}

fn corrupt(key: &str, reason: &str) -> NotarizationError {
    NotarizationError::CorruptState {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
