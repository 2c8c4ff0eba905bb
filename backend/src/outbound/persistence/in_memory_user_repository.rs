//! Process-local user repository.
//!
//! Records live in a `Vec` behind an async `RwLock`, so listing returns
//! insertion order. The email uniqueness check and the write happen under the
//! same write guard, which gives the same guarantee as a unique index.
//! Updates merge their changes into the stored record under that guard too.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserChanges, UserDetails, UserId};

/// In-memory [`UserRepository`] used when no document store is configured.
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Create an empty repository stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Create an empty repository stamped by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            clock,
        }
    }

    fn next_id() -> Result<UserId, UserPersistenceError> {
        UserId::new(ObjectId::new().to_hex())
            .map_err(|err| UserPersistenceError::query(format!("generated id rejected: {err}")))
    }
}

fn duplicate_email(email: &EmailAddress) -> UserPersistenceError {
    UserPersistenceError::duplicate_key(format!("email {email} already registered"))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, details: &UserDetails) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.iter().any(|user| user.details().email() == details.email()) {
            return Err(duplicate_email(details.email()));
        }
        let now = self.clock.utc();
        let user = User::new(Self::next_id()?, details.clone(), now, now);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|user| user.details().email() == email)
            .cloned())
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        if let Some(email) = changes.email() {
            if users
                .iter()
                .any(|other| other.id() != id && other.details().email() == email)
            {
                return Err(duplicate_email(email));
            }
        }
        let slot = users
            .iter_mut()
            .find(|stored| stored.id() == id)
            .ok_or_else(|| UserPersistenceError::missing(id.to_string()))?;
        let details = changes.apply_to(slot.details());
        let updated = slot.clone().with_details(details).touched(self.clock.utc());
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.users.write().await;
        let position = users.iter().position(|user| user.id() == id);
        Ok(position.map(|index| users.remove(index)))
    }
}
