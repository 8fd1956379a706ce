//! Pure domain logic for the schema-migration runner.
//!
//! Everything in this crate is synchronous and I/O-free: invocation
//! parameter resolution, credential extraction from a secret payload,
//! and the invocation outcome summary. Cloud clients and the database
//! engine live in `sqlshift-cloud` and `sqlshift-engine`.

pub mod credentials;
pub mod error;
pub mod outcome;
pub mod params;
