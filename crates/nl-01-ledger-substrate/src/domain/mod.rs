//! # Domain Layer
//!
//! Key encodings and ledger entities, free of storage concerns.

pub mod composite_key;
pub mod entities;

pub use composite_key::{
    create_composite_key, is_composite_key, partial_key_range, split_composite_key,
    validate_state_key, MAX_UNICODE_RUNE, MIN_UNICODE_RUNE,
};
pub use entities::{CommitReceipt, KeyModification, Version};
