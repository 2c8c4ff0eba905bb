//! Port abstraction for user persistence adapters and their errors.
//!
//! The repository owns identity and timestamps: `insert` assigns the id and
//! both timestamps, `update` refreshes `updated_at`. Adapters must reject a
//! second record with the same normalised email with
//! [`UserPersistenceError::DuplicateKey`].
//!
//! `update` writes only the changed fields in one atomic step, so concurrent
//! updates touching different fields both survive.

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserChanges, UserDetails, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        DuplicateKey { message: String } => "user repository duplicate key: {message}",
        /// The record to update no longer exists.
        Missing { id: String } => "user {id} no longer exists",
    }
}

/// Persistence collaborator for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new record, assigning its id and timestamps.
    async fn insert(&self, details: &UserDetails) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch every user in the store's natural order.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch the user owning `email`, if any.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Apply `changes` to the stored record, refreshing `updated_at`, and
    /// return the record as stored afterwards.
    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError>;

    /// Remove a user, returning the removed record when one existed.
    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn errors_format_with_context() {
        assert_eq!(
            UserPersistenceError::duplicate_key("email_1").to_string(),
            "user repository duplicate key: email_1"
        );
        assert_eq!(
            UserPersistenceError::missing("65a1f0c2e4b0a1b2c3d4e5f6").to_string(),
            "user 65a1f0c2e4b0a1b2c3d4e5f6 no longer exists"
        );
    }
}
