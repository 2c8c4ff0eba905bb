//! Correlation ids for user registry requests.
//!
//! A request keeps the id its caller sent in the `trace-id` header when that
//! value is a non-nil UUID; otherwise it gets a fresh one. The id is held in
//! a task-local while the request runs, so domain errors and log lines pick
//! it up without it being passed around. Spawned tasks do not inherit it.

use std::fmt;
use std::future::Future;

use tokio::task::futures::TaskLocalFuture;
use tokio::task_local;
use uuid::Uuid;

/// Request and response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Correlation id for one request.
///
/// # Examples
/// ```
/// use user_registry::TraceId;
///
/// let reused = TraceId::for_request(Some(b"7c9e6679-7425-40de-944b-e07fc1f90ae7".as_slice()));
/// assert_eq!(reused.to_string(), "7c9e6679-7425-40de-944b-e07fc1f90ae7");
///
/// let fresh = TraceId::for_request(Some(b"not-a-uuid".as_slice()));
/// assert_ne!(fresh.to_string(), "not-a-uuid");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Adopt a caller-supplied header value when it is a non-nil UUID.
    #[must_use]
    pub fn from_header(raw: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(raw).ok()?;
        Uuid::parse_str(text.trim())
            .ok()
            .filter(|uuid| !uuid.is_nil())
            .map(Self)
    }

    /// Id for an incoming request: the caller's when usable, else a new one.
    #[must_use]
    pub fn for_request(header: Option<&[u8]>) -> Self {
        header
            .and_then(Self::from_header)
            .unwrap_or_else(Self::generate)
    }

    /// The id of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with this id as [`TraceId::current`].
    pub fn scope<F: Future>(self, fut: F) -> TaskLocalFuture<Self, F> {
        CURRENT.scope(self, fut)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn current_is_set_only_inside_scope() {
        let id = TraceId::generate();
        assert_eq!(id.scope(async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[case(b"7c9e6679-7425-40de-944b-e07fc1f90ae7".as_slice())]
    #[case(b"  7c9e6679-7425-40de-944b-e07fc1f90ae7 ".as_slice())]
    fn caller_uuid_is_adopted(#[case] raw: &[u8]) {
        let id = TraceId::from_header(raw).expect("uuid header");
        assert_eq!(id.to_string(), "7c9e6679-7425-40de-944b-e07fc1f90ae7");
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"not-a-trace".as_slice())]
    #[case(b"00000000-0000-0000-0000-000000000000".as_slice())]
    #[case(b"\xff\xfe".as_slice())]
    fn unusable_header_values_are_rejected(#[case] raw: &[u8]) {
        assert!(TraceId::from_header(raw).is_none());
    }

    #[rstest]
    fn missing_header_mints_distinct_ids() {
        assert_ne!(TraceId::for_request(None), TraceId::for_request(None));
    }
}
