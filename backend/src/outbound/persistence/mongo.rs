//! Document store connection handling.
//!
//! [`MongoHandle::connect`] parses the URI, pings the server, and ensures the
//! unique email index before any request is served, so a misconfigured store
//! fails at startup rather than on the first request. The handle also serves
//! as the readiness [`StoreHealth`].

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::info;

use super::mongo_user_repository::UserDocument;
use crate::domain::ports::{StoreHealth, StoreHealthError};

/// Errors raised while establishing the store connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MongoError {
    /// The connection string could not be parsed.
    #[error("invalid document store uri: {message}")]
    InvalidUri { message: String },

    /// The server could not be reached or rejected the ping.
    #[error("document store unreachable: {message}")]
    Unreachable { message: String },

    /// Creating the unique email index failed.
    #[error("failed to ensure user indexes: {message}")]
    Index { message: String },
}

impl MongoError {
    /// Create an invalid-uri error with the given message.
    pub fn invalid_uri(message: impl Into<String>) -> Self {
        Self::InvalidUri {
            message: message.into(),
        }
    }

    /// Create an unreachable error with the given message.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create an index error with the given message.
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index {
            message: message.into(),
        }
    }
}

/// Connection settings for the document store.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use user_registry::outbound::persistence::MongoConfig;
///
/// let config = MongoConfig::new("mongodb://localhost:27017", "users_db")
///     .with_collection("people")
///     .with_server_selection_timeout(Duration::from_secs(2));
/// assert_eq!(config.database(), "users_db");
/// assert_eq!(config.collection(), "people");
/// ```
#[derive(Debug, Clone)]
pub struct MongoConfig {
    uri: String,
    database: String,
    collection: String,
    server_selection_timeout: Duration,
}

impl MongoConfig {
    /// Default collection holding user documents.
    pub const DEFAULT_COLLECTION: &'static str = "users";

    /// Create settings for `uri` and `database`.
    ///
    /// Defaults: collection `users`, server selection timeout 5 seconds.
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            collection: Self::DEFAULT_COLLECTION.to_owned(),
            server_selection_timeout: Duration::from_secs(5),
        }
    }

    /// Override the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Override how long the driver waits for a usable server.
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    /// Database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Connected client plus the user collection.
#[derive(Clone)]
pub struct MongoHandle {
    database: Database,
    users: Collection<UserDocument>,
}

impl MongoHandle {
    /// Connect, verify reachability, and ensure the unique email index.
    ///
    /// # Errors
    ///
    /// Returns [`MongoError`] when the URI is invalid, the server does not
    /// answer a ping within the selection timeout, or index creation fails.
    pub async fn connect(config: &MongoConfig) -> Result<Self, MongoError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|err| MongoError::invalid_uri(err.to_string()))?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_owned());

        let client =
            Client::with_options(options).map_err(|err| MongoError::invalid_uri(err.to_string()))?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|err| MongoError::unreachable(err.to_string()))?;

        let users = database.collection::<UserDocument>(&config.collection);
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        users
            .create_index(index, None)
            .await
            .map_err(|err| MongoError::index(err.to_string()))?;

        info!(
            database = config.database.as_str(),
            collection = config.collection.as_str(),
            "connected to document store"
        );
        Ok(Self { database, users })
    }

    pub(super) fn users(&self) -> Collection<UserDocument> {
        self.users.clone()
    }
}

#[async_trait]
impl StoreHealth for MongoHandle {
    async fn ping(&self) -> Result<(), StoreHealthError> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(|err| StoreHealthError::unreachable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_defaults() {
        let config = MongoConfig::new("mongodb://localhost:27017", "users_db");
        assert_eq!(config.collection(), "users");
        assert_eq!(config.server_selection_timeout, Duration::from_secs(5));
    }

    #[rstest]
    #[tokio::test]
    async fn connect_rejects_malformed_uri() {
        let err = MongoHandle::connect(&MongoConfig::new("not-a-uri", "users_db"))
            .await
            .err()
            .expect("malformed uri");
        assert!(matches!(err, MongoError::InvalidUri { .. }));
    }
}
