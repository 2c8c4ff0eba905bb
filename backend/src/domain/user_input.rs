//! Raw user input and partial updates, plus the validation that turns them
//! into [`UserDetails`] and [`UserChanges`].

use crate::domain::user::{
    Address, EmailAddress, GeoPoint, UserDetails, UserValidationError, ValidationErrors,
};

/// Unvalidated geographic coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInput {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Unvalidated postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub geo: Option<GeoInput>,
}

/// Unvalidated field set for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<AddressInput>,
}

/// A text value counts as supplied only when present and non-empty.
fn is_supplied(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.is_empty())
}

impl UserInput {
    /// Required fields that are absent or empty, in declaration order.
    ///
    /// Whitespace-only values count as present here; they are rejected later
    /// by [`validate_user_input`] once trimmed.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("name", self.name.as_deref()),
            ("email", self.email.as_deref()),
            ("phone", self.phone.as_deref()),
        ]
        .into_iter()
        .filter(|(_, value)| !is_supplied(*value))
        .map(|(field, _)| field)
        .collect()
    }
}

/// Partial update for an existing user.
///
/// Merge policy: a text field overwrites the stored value only when it is
/// present and non-empty, so `""` never clears a field. A supplied address
/// replaces the stored address wholesale, even when it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<AddressInput>,
}

/// Validated field-level changes for a stored user.
///
/// `None` leaves the stored field untouched. `company` is `Some(None)` when a
/// whitespace-only value was supplied, which clears the stored company.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<EmailAddress>,
    pub(crate) phone: Option<String>,
    pub(crate) company: Option<Option<String>>,
    pub(crate) address: Option<Address>,
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

impl UserPatch {
    /// Validate the supplied fields, dropping empty ones per the merge policy.
    ///
    /// # Errors
    /// Returns [`ValidationErrors`] when a supplied required field is blank
    /// after trimming or a supplied email is malformed.
    ///
    /// # Examples
    /// ```
    /// use user_registry::domain::UserPatch;
    ///
    /// let patch = UserPatch { name: Some(String::new()), company: Some("Acme".into()), ..UserPatch::default() };
    /// let changes = patch.validate().expect("valid changes");
    /// assert_eq!(changes.name(), None);
    /// assert_eq!(changes.company(), Some(Some("Acme")));
    /// ```
    pub fn validate(self) -> Result<UserChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name =
            supplied(self.name).and_then(|text| required_text(Some(text), "name", &mut errors));
        let email = match supplied(self.email).as_deref().map(EmailAddress::parse) {
            Some(Ok(email)) => Some(email),
            Some(Err(error)) => {
                errors.push(error);
                None
            }
            None => None,
        };
        let phone =
            supplied(self.phone).and_then(|text| required_text(Some(text), "phone", &mut errors));

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(UserChanges {
            name,
            email,
            phone,
            company: supplied(self.company).map(|text| optional_text(Some(text))),
            address: self.address.map(normalise_address),
        })
    }
}

impl UserChanges {
    /// New display name, if changed.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// New email address, if changed.
    #[must_use]
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// New phone number, if changed.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// `Some(None)` clears the company; `None` leaves it.
    #[must_use]
    pub fn company(&self) -> Option<Option<&str>> {
        self.company.as_ref().map(Option::as_deref)
    }

    /// Replacement address, if supplied.
    #[must_use]
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Apply the changes over `current`.
    #[must_use]
    pub fn apply_to(&self, current: &UserDetails) -> UserDetails {
        UserDetails {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            phone: self.phone.clone().unwrap_or_else(|| current.phone.clone()),
            company: self
                .company
                .clone()
                .unwrap_or_else(|| current.company.clone()),
            address: self.address.clone().or_else(|| current.address.clone()),
        }
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn required_text(
    value: Option<String>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let text = optional_text(value);
    if text.is_none() {
        errors.push(UserValidationError::Required { field });
    }
    text
}

fn normalise_address(input: AddressInput) -> Address {
    let geo = input
        .geo
        .map(|geo| GeoPoint {
            lat: optional_text(geo.lat),
            lng: optional_text(geo.lng),
        })
        .filter(|geo| geo.lat.is_some() || geo.lng.is_some());
    Address {
        street: optional_text(input.street),
        city: optional_text(input.city),
        zipcode: optional_text(input.zipcode),
        geo,
    }
}

/// Validate raw input, collecting every field failure.
///
/// Text is trimmed, the email is lower-cased and pattern-checked, and blank
/// optional values are dropped.
///
/// # Errors
/// Returns [`ValidationErrors`] listing each required field that is blank and
/// any malformed email address.
pub fn validate_user_input(input: UserInput) -> Result<UserDetails, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required_text(input.name, "name", &mut errors);
    let email = match input.email.as_deref().map(EmailAddress::parse) {
        Some(Ok(email)) => Some(email),
        Some(Err(error)) => {
            errors.push(error);
            None
        }
        None => {
            errors.push(UserValidationError::Required { field: "email" });
            None
        }
    };
    let phone = required_text(input.phone, "phone", &mut errors);

    match (name, email, phone) {
        (Some(name), Some(email), Some(phone)) if errors.is_empty() => Ok(UserDetails {
            name,
            email,
            phone,
            company: optional_text(input.company),
            address: input.address.map(normalise_address),
        }),
        _ => Err(errors),
    }
}
