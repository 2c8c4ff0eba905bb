//! Mapping from driver failures to user persistence errors.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use tracing::debug;

use crate::domain::ports::UserPersistenceError;

/// Server code reported when a unique index rejects a write.
pub(super) const DUPLICATE_KEY_CODE: i32 = 11000;

/// Whether the driver error is a unique index violation.
pub(super) fn is_duplicate_key(error: &MongoError) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Map a driver error into the repository error taxonomy.
pub(super) fn map_mongo_error(error: MongoError) -> UserPersistenceError {
    debug!(error = %error, "document store operation failed");

    if is_duplicate_key(&error) {
        return UserPersistenceError::duplicate_key(error.to_string());
    }
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. } => UserPersistenceError::connection(error.to_string()),
        _ => UserPersistenceError::query(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn io_error() -> MongoError {
        MongoError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    #[rstest]
    fn io_failures_map_to_connection() {
        let mapped = map_mongo_error(io_error());
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    fn io_failures_are_not_duplicates() {
        assert!(!is_duplicate_key(&io_error()));
    }
}
