//! Shared helper utilities for integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module is the common home for helpers they share.

pub mod mongo_skip;

pub use mongo_skip::test_mongo_uri;
