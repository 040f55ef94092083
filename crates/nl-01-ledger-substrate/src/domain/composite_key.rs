//! # Composite Keys
//!
//! Composite keys let a record be found through attributes other than its
//! primary key. The encoding is
//!
//! ```text
//! U+0000 objectType U+0000 attr1 U+0000 attr2 U+0000 ...
//! ```
//!
//! so every key of one object type sorts into a contiguous range, and any
//! prefix of the attribute list selects a sub-range ending at `U+10FFFF`.

use shared_types::errors::SubstrateError;

/// Separator and leading marker of a composite key.
pub const MIN_UNICODE_RUNE: char = '\u{0}';

/// Upper bound used to close a partial-key range.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

fn invalid(key: &str, reason: impl Into<String>) -> SubstrateError {
    SubstrateError::InvalidKey {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_component(component: &str) -> Result<(), SubstrateError> {
    if component.contains(MIN_UNICODE_RUNE) || component.contains(MAX_UNICODE_RUNE) {
        return Err(invalid(
            component,
            "composite key component must not contain U+0000 or U+10FFFF",
        ));
    }
    Ok(())
}

/// Builds a composite key from an object type and its attributes.
///
/// # Errors
///
/// `SubstrateError::InvalidKey` if the object type is empty or any component
/// contains `U+0000` or `U+10FFFF`.
pub fn create_composite_key(object_type: &str, attributes: &[&str]) -> Result<String, SubstrateError> {
    if object_type.is_empty() {
        return Err(invalid(object_type, "object type must not be empty"));
    }
    validate_component(object_type)?;

    let capacity = 2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(MIN_UNICODE_RUNE);
    key.push_str(object_type);
    key.push(MIN_UNICODE_RUNE);
    for attribute in attributes {
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(MIN_UNICODE_RUNE);
    }
    Ok(key)
}

/// Splits a composite key back into its object type and attributes.
///
/// # Errors
///
/// `SubstrateError::InvalidKey` if the key is not composite-encoded.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>), SubstrateError> {
    let body = key
        .strip_prefix(MIN_UNICODE_RUNE)
        .and_then(|rest| rest.strip_suffix(MIN_UNICODE_RUNE))
        .ok_or_else(|| invalid(key, "not a composite key"))?;

    let mut parts = body.split(MIN_UNICODE_RUNE).map(str::to_string);
    let object_type = parts
        .next()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| invalid(key, "composite key has no object type"))?;
    Ok((object_type, parts.collect()))
}

/// Returns true if the key uses the composite encoding.
#[must_use]
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(MIN_UNICODE_RUNE)
}

/// Half-open key range `[start, end)` selecting every composite key whose
/// attributes begin with `attributes`.
///
/// # Errors
///
/// Same as [`create_composite_key`].
pub fn partial_key_range(
    object_type: &str,
    attributes: &[&str],
) -> Result<(String, String), SubstrateError> {
    let start = create_composite_key(object_type, attributes)?;
    let mut end = start.clone();
    end.push(MAX_UNICODE_RUNE);
    Ok((start, end))
}

/// Checks a key passed to a plain state operation.
///
/// Plain keys must be non-empty and must not begin with `U+0000`, which is
/// reserved for composite keys; composite keys must split cleanly.
///
/// # Errors
///
/// `SubstrateError::InvalidKey` on any violation.
pub fn validate_state_key(key: &str) -> Result<(), SubstrateError> {
    if key.is_empty() {
        return Err(invalid(key, "key must not be empty"));
    }
    if is_composite_key(key) {
        split_composite_key(key)?;
    }
    Ok(())
}
