//! # Adapters Layer (Outer Hexagon)
//!
//! - `dispatcher`: function-name routing from the invocation surface into
//!   the lifecycle

pub mod dispatcher;

pub use dispatcher::{
    contract_name, dispatch, dispatch_by_name, parse_bool, ContractFunction, CONTRACT_NAME,
};
