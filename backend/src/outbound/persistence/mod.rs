//! Persistence adapters for the user repository port.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between stored shapes and
//!   domain types. Validation and merge rules live in the domain.
//! - **Internal documents**: BSON document structs are private to this
//!   module and never exposed to the domain layer.
//! - **Strongly typed errors**: driver errors are mapped to
//!   [`crate::domain::ports::UserPersistenceError`] variants.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), user_registry::outbound::persistence::MongoError> {
//! use user_registry::outbound::persistence::{MongoConfig, MongoHandle, MongoUserRepository};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017", "users_db");
//! let handle = MongoHandle::connect(&config).await?;
//! let repo = MongoUserRepository::new(&handle);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod in_memory_user_repository;
mod mongo;
mod mongo_error_mapping;
mod mongo_user_repository;

pub use in_memory_user_repository::InMemoryUserRepository;
pub use mongo::{MongoConfig, MongoError, MongoHandle};
pub use mongo_user_repository::MongoUserRepository;
