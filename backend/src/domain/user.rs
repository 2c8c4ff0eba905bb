//! User data model.
//!
//! [`UserDetails`] is the validated, mutable part of a user record;
//! [`User`] adds the store-assigned identifier and timestamps. Raw request
//! input is turned into details by [`crate::domain::validate_user_input`].

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Value, json};

/// Length of a hex-encoded document identifier.
pub const USER_ID_LEN: usize = 24;

/// Errors raised when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    Empty,
    /// The identifier is not 24 hexadecimal digits.
    #[error("user id must be {USER_ID_LEN} hexadecimal characters")]
    Malformed,
}

/// Opaque user identifier assigned by the persistence layer.
///
/// Identifiers are 12-byte document ids rendered as 24 lower-case hex digits.
/// Parsing accepts either case and normalises to lower case.
///
/// # Examples
/// ```
/// use user_registry::domain::UserId;
///
/// let id = UserId::new("65A1F0C2E4B0A1B2C3D4E5F6").expect("valid id");
/// assert_eq!(id.as_ref(), "65a1f0c2e4b0a1b2c3d4e5f6");
/// assert!(UserId::new("not-an-id").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserIdError::Empty);
        }
        if raw.len() != USER_ID_LEN || !raw.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(UserIdError::Malformed);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Field-level validation failures for user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// A required field was absent or blank after trimming.
    Required { field: &'static str },
    /// The email address does not look like `local@domain.tld`.
    InvalidEmail,
}

impl UserValidationError {
    /// Name of the offending field as it appears on the wire.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field } => field,
            Self::InvalidEmail => "email",
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field: "name" } => write!(f, "Name is required"),
            Self::Required { field: "email" } => write!(f, "Email is required"),
            Self::Required { field: "phone" } => write!(f, "Phone number is required"),
            Self::Required { field } => write!(f, "{field} is required"),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Every validation failure found in a single record, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<UserValidationError>);

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: UserValidationError) {
        self.0.push(error);
    }

    /// Returns `true` when no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recorded failures.
    pub fn iter(&self) -> impl Iterator<Item = &UserValidationError> {
        self.0.iter()
    }

    /// Render the failures as a JSON details object for error payloads.
    ///
    /// # Examples
    /// ```
    /// use user_registry::domain::{UserInput, validate_user_input};
    ///
    /// let errors = validate_user_input(UserInput::default()).expect_err("empty input");
    /// let details = errors.to_details();
    /// assert_eq!(details["errors"][0]["field"], "name");
    /// ```
    #[must_use]
    pub fn to_details(&self) -> Value {
        let errors: Vec<Value> = self
            .0
            .iter()
            .map(|error| {
                json!({
                    "field": error.field(),
                    "code": error.code(),
                    "message": error.to_string(),
                })
            })
            .collect();
        json!({ "errors": errors })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\S+@\S+\.\S+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address: trimmed, lower-cased, shaped like `a@b.c`.
///
/// # Examples
/// ```
/// use user_registry::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  ANA@X.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "ana@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate raw input.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::Required { field: "email" });
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic coordinates kept as text to preserve their formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeoPoint {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Postal address embedded in a user record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub geo: Option<GeoPoint>,
}

/// Validated, user-editable fields of a record.
///
/// ## Invariants
/// - `name` and `phone` are trimmed and non-empty.
/// - `email` is normalised per [`EmailAddress`].
/// - Optional text fields are trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub(crate) name: String,
    pub(crate) email: EmailAddress,
    pub(crate) phone: String,
    pub(crate) company: Option<String>,
    pub(crate) address: Option<Address>,
}

impl UserDetails {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalised email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Contact phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Employer, if recorded.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Postal address, if recorded.
    #[must_use]
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }
}

/// Stored user record.
///
/// ## Invariants
/// - `id` is assigned once by the repository and never changes.
/// - `created_at <= updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    details: UserDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a record from stored parts.
    #[must_use]
    pub fn new(
        id: UserId,
        details: UserDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            created_at,
            updated_at,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Editable fields.
    #[must_use]
    pub fn details(&self) -> &UserDetails {
        &self.details
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last successful write.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the editable fields, keeping identity and timestamps.
    ///
    /// Repositories refresh `updated_at` when they store the result.
    #[must_use]
    pub fn with_details(self, details: UserDetails) -> Self {
        Self { details, ..self }
    }

    /// Return a copy with `updated_at` set to `now`.
    #[must_use]
    pub fn touched(self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            ..self
        }
    }
}
