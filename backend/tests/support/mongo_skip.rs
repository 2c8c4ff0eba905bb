//! Helpers for running document store tests only where a server exists.
//!
//! Suites that need a live server read its URI from `USERS_TEST_MONGO_URI`.
//! When the variable is unset they print a skip marker and return early, so
//! local runs without a server stay green while CI can opt in.

/// Environment variable naming the test server.
pub const TEST_MONGO_URI_VAR: &str = "USERS_TEST_MONGO_URI";

/// Return the configured test server URI, or print a skip marker.
pub fn test_mongo_uri(test_name: &str) -> Option<String> {
    match std::env::var(TEST_MONGO_URI_VAR) {
        Ok(uri) if !uri.trim().is_empty() => Some(uri),
        _ => {
            eprintln!("SKIP-TEST-MONGO: {test_name} ({TEST_MONGO_URI_VAR} not set)");
            None
        }
    }
}
