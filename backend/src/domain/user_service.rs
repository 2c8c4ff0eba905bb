//! User operations: list, fetch, create, update, and delete.
//!
//! [`UserService`] implements the [`UsersQuery`] and [`UsersCommand`] driving
//! ports on top of any [`UserRepository`]. Persistence failures that are not
//! part of the contract are logged here and surface as a generic server error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{
    Error, TraceId, User, UserDetails, UserId, UserInput, UserPatch, validate_user_input,
};

/// Message returned for unclassified failures.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";
/// Message returned when a user id matches no record.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
/// Message returned when create input lacks a required field.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Name, email and phone are required";
/// Message returned when create input fails field validation.
pub const INVALID_USER_DATA_MESSAGE: &str = "Invalid user data";
/// Message returned when the email is already registered.
pub const EMAIL_EXISTS_MESSAGE: &str = "Email already exists";
/// Message returned when an update is rejected.
pub const INVALID_ID_OR_DATA_MESSAGE: &str = "Invalid user ID or data";

/// User service implementing the driving ports.
pub struct UserService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: ?Sized> UserService<R> {
    /// Create a service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn server_error(operation: &'static str, err: &UserPersistenceError) -> Error {
    let trace_id = TraceId::current().map(|id| id.to_string());
    error!(operation, error = %err, trace_id = ?trace_id, "user repository failure");
    Error::internal(SERVER_ERROR_MESSAGE)
}

fn not_found(id: &UserId) -> Error {
    debug!(user_id = %id, "user not found");
    Error::not_found(USER_NOT_FOUND_MESSAGE)
}

fn duplicate_email_details() -> serde_json::Value {
    json!({
        "errors": [{
            "field": "email",
            "code": "duplicate_email",
            "message": EMAIL_EXISTS_MESSAGE,
        }]
    })
}

impl<R> UserService<R>
where
    R: UserRepository + ?Sized,
{
    fn validate_new_user(input: UserInput) -> Result<UserDetails, Error> {
        let missing = input.missing_required();
        if !missing.is_empty() {
            return Err(
                Error::invalid_request(REQUIRED_FIELDS_MESSAGE).with_details(json!({
                    "code": "missing_field",
                    "fields": missing,
                })),
            );
        }
        validate_user_input(input).map_err(|errors| {
            Error::invalid_request(INVALID_USER_DATA_MESSAGE).with_details(errors.to_details())
        })
    }

    async fn ensure_email_free(&self, details: &UserDetails) -> Result<(), Error> {
        let existing = self
            .repo
            .find_by_email(details.email())
            .await
            .map_err(|err| server_error("create_user", &err))?;
        match existing {
            Some(user) => {
                debug!(existing_id = %user.id(), "email already registered");
                Err(Error::conflict(EMAIL_EXISTS_MESSAGE))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repo
            .find_all()
            .await
            .map_err(|err| server_error("list_users", &err))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|err| server_error("get_user", &err))?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn create_user(&self, input: UserInput) -> Result<User, Error> {
        let details = Self::validate_new_user(input)?;
        self.ensure_email_free(&details).await?;

        // The pre-check races with concurrent creates; the store's unique
        // index decides the loser.
        match self.repo.insert(&details).await {
            Ok(user) => {
                info!(user_id = %user.id(), "user created");
                Ok(user)
            }
            Err(UserPersistenceError::DuplicateKey { message }) => {
                debug!(%message, "insert rejected by unique index");
                Err(Error::conflict(EMAIL_EXISTS_MESSAGE))
            }
            Err(err) => Err(server_error("create_user", &err)),
        }
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, Error> {
        // Unknown ids report 404 ahead of validation failures.
        self.repo
            .find_by_id(id)
            .await
            .map_err(|err| server_error("update_user", &err))?
            .ok_or_else(|| not_found(id))?;

        let changes = patch.validate().map_err(|errors| {
            Error::invalid_request(INVALID_ID_OR_DATA_MESSAGE).with_details(errors.to_details())
        })?;

        match self.repo.update(id, &changes).await {
            Ok(user) => {
                info!(user_id = %user.id(), "user updated");
                Ok(user)
            }
            Err(UserPersistenceError::DuplicateKey { .. }) => Err(Error::invalid_request(
                INVALID_ID_OR_DATA_MESSAGE,
            )
            .with_details(duplicate_email_details())),
            Err(UserPersistenceError::Missing { .. }) => Err(not_found(id)),
            Err(err) => Err(server_error("update_user", &err)),
        }
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|err| server_error("delete_user", &err))?;
        match removed {
            Some(_) => {
                info!(user_id = %id, "user removed");
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
