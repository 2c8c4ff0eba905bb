//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USERS_*` environment variables, and an
//! optional configuration file, in OrthoConfig's usual precedence. The bare
//! `MONGO_URI` variable is honoured as a fallback for the connection string.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::MongoConfig;

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "users_db";
/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Connection string variable read when `USERS_MONGO_URI` is unset.
pub const FALLBACK_MONGO_URI_VAR: &str = "MONGO_URI";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// Neither a connection string nor the in-memory opt-in is set.
    #[error(
        "no document store configured: set USERS_MONGO_URI (or MONGO_URI), \
         or USERS_IN_MEMORY=true to keep users in process memory"
    )]
    MissingStore,
    /// A connection string and the in-memory opt-in were both set.
    #[error("USERS_IN_MEMORY cannot be combined with a document store connection string")]
    ConflictingStores,
}

/// Repository selected by the loaded settings.
#[derive(Debug, Clone)]
pub enum StoreSettings {
    /// Connect to the configured document store.
    Mongo(MongoConfig),
    /// Keep users in process memory; they are lost on exit.
    InMemory,
}

/// Startup settings for the user registry.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct AppSettings {
    /// Document store connection string.
    pub mongo_uri: Option<String>,
    /// Serve from process memory instead of a document store.
    #[ortho_config(default = false)]
    pub in_memory: bool,
    /// Database holding the `users` collection.
    pub database: Option<String>,
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
}

impl AppSettings {
    /// Return the configured database, falling back to the default.
    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    /// Parse the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse as a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    fn mongo_uri(&self) -> Option<String> {
        self.mongo_uri
            .clone()
            .or_else(|| std::env::var(FALLBACK_MONGO_URI_VAR).ok())
            .filter(|uri| !uri.trim().is_empty())
    }

    /// Choose the repository backing the service.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingStore`] when no connection string is
    /// set and the in-memory store was not requested, and
    /// [`SettingsError::ConflictingStores`] when both are set.
    pub fn store(&self) -> Result<StoreSettings, SettingsError> {
        match (self.mongo_uri(), self.in_memory) {
            (Some(uri), false) => Ok(StoreSettings::Mongo(MongoConfig::new(uri, self.database()))),
            (None, true) => Ok(StoreSettings::InMemory),
            (Some(_), true) => Err(SettingsError::ConflictingStores),
            (None, false) => Err(SettingsError::MissingStore),
        }
    }
}
