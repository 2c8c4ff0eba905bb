//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, UserInput, UserPatch};

/// Domain use-case port for creating, updating, and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate and store a new user.
    async fn create_user(&self, input: UserInput) -> Result<User, Error>;

    /// Apply the supplied fields of `patch` to the stored user.
    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, Error>;

    /// Hard-delete a user.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
