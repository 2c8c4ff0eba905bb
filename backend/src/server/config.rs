//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use user_registry::domain::ports::UserRepository;
use user_registry::outbound::persistence::InMemoryUserRepository;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repository: Arc<dyn UserRepository>,
}

impl ServerConfig {
    /// Construct a configuration backed by an in-memory repository.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            repository: Arc::new(InMemoryUserRepository::new()),
        }
    }

    /// Attach the repository the user operations persist through.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.repository = repository;
        self
    }
}
