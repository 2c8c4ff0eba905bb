//! Port for checking that the user store can serve requests.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by store reachability checks.
    pub enum StoreHealthError {
        /// The store did not answer.
        Unreachable { message: String } => "user store unreachable: {message}",
    }
}

/// Reachability check consumed by the readiness endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Round-trip to the store.
    async fn ping(&self) -> Result<(), StoreHealthError>;
}
