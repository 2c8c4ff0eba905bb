//! Test utilities shared by unit tests (in `src/`) and integration tests
//! (in `tests/`).
//!
//! Compiled for `cfg(test)` and when the `test-support` feature is enabled.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{UserInput, UserService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::InMemoryUserRepository;

/// Clock whose reading only changes when a test advances it.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use mockable::Clock;
/// use user_registry::test_support::MutableClock;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("timestamp");
/// let clock = MutableClock::new(start);
/// clock.advance_seconds(5);
/// assert_eq!((clock.utc() - start).num_seconds(), 5);
/// ```
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Build HTTP state backed by a fresh in-memory repository.
pub fn in_memory_state() -> HttpState {
    let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
    HttpState::new(Arc::new(service.clone()), Arc::new(service))
}

/// A complete create payload for `name` and `email`.
pub fn user_input(name: &str, email: &str) -> UserInput {
    UserInput {
        name: Some(name.to_owned()),
        email: Some(email.to_owned()),
        phone: Some("555-0100".to_owned()),
        ..UserInput::default()
    }
}
