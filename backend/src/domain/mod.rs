//! Domain types and services for the user registry.
//!
//! Purpose: model user records independently of transport and storage.
//! Inbound adapters call the driving ports in [`ports`]; persistence
//! adapters implement [`ports::UserRepository`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User / UserDetails / UserId: validated user aggregate.
//! - UserInput / UserPatch: raw create and update payloads; UserChanges is a
//!   validated patch.
//! - UserService: the five user operations over a repository.
//! - TraceId: per-request correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_input;
pub mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Address, EmailAddress, GeoPoint, USER_ID_LEN, User, UserDetails, UserId, UserIdError,
    UserValidationError, ValidationErrors,
};
pub use self::user_input::{
    AddressInput, GeoInput, UserChanges, UserInput, UserPatch, validate_user_input,
};
pub use self::user_service::UserService;

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use user_registry::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("User not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
