//! Domain ports for the hexagonal boundary.
//!
//! - [`UserRepository`] is the driven port implemented by persistence
//!   adapters.
//! - [`UsersQuery`] and [`UsersCommand`] are the driving ports the HTTP
//!   adapter calls; [`crate::domain::UserService`] implements both.
//! - [`StoreHealth`] lets the readiness endpoint check the store.

mod macros;
pub(crate) use macros::define_port_error;

mod store_health;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::{StoreHealth, StoreHealthError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
