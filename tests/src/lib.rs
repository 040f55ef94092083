//! # Notary-Ledger Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs       # Credentials, payloads, a wired service
//! │   └── integration/      # End-to-end flows through the service
//! │       ├── lifecycle_flows.rs
//! │       ├── concurrency.rs
//! │       ├── endorsement.rs
//! │       ├── notifications.rs
//! │       └── private_data.rs
//! └── benches/
//!     └── lifecycle_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p nl-tests
//!
//! # By category
//! cargo test -p nl-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p nl-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
