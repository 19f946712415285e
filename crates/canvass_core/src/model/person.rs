//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical canvassing record shape.
//! - Validate and normalize creation input before persistence.
//! - Render stored epoch-millisecond timestamps as ISO-8601 instants.
//!
//! # Invariants
//! - `id` is store-assigned, unique and never reused.
//! - `first_name`/`last_name` are non-empty after trimming for any record
//!   that passed validation.
//! - Only `notes` and `updated_at` may change after creation.

use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier assigned by the record store on creation.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PersonId = i64;

/// Validation failure for person creation input.
///
/// `Display` output is the user-facing message returned verbatim by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonValidationError {
    /// First name missing or blank after trimming.
    MissingFirstName,
    /// Last name missing or blank after trimming.
    MissingLastName,
    /// Email present and non-blank but not plausibly an address.
    InvalidEmail,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFirstName => write!(f, "First name is required"),
            Self::MissingLastName => write!(f, "Last name is required"),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
        }
    }
}

impl Error for PersonValidationError {}

/// Canonical canvassing record as stored and returned by every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    /// Optional contact email; `None` when the caller omitted or blanked it.
    pub email: Option<String>,
    /// Free-text notes; empty string when never set.
    pub notes: String,
    /// Creation instant in epoch milliseconds, set once by the store.
    #[serde(with = "iso_instant")]
    pub created_at: i64,
    /// Last-update instant in epoch milliseconds, refreshed on every update.
    #[serde(with = "iso_instant")]
    pub updated_at: i64,
}

/// Creation input for a person record.
///
/// Carries raw caller-provided values; `validate()` must pass and the
/// `normalized_*` accessors must be used before any SQL write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPerson {
    /// Checks creation input in fixed order: first name, last name, email.
    ///
    /// The email rule only applies when a non-blank value is present; the
    /// check is a deliberate minimum (`@` must appear somewhere).
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(PersonValidationError::MissingFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(PersonValidationError::MissingLastName);
        }
        if let Some(email) = &self.email {
            let trimmed = email.trim();
            if !trimmed.is_empty() && !trimmed.contains('@') {
                return Err(PersonValidationError::InvalidEmail);
            }
        }
        Ok(())
    }

    /// First name with surrounding whitespace removed.
    pub fn normalized_first_name(&self) -> &str {
        self.first_name.trim()
    }

    /// Last name with surrounding whitespace removed.
    pub fn normalized_last_name(&self) -> &str {
        self.last_name.trim()
    }

    /// Trimmed email, with blank values collapsed to `None`.
    pub fn normalized_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Notes value as stored: caller text, or empty string when omitted.
    pub fn normalized_notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

/// Formats an epoch-millisecond instant as ISO-8601 with millisecond
/// precision and `Z` suffix, e.g. `2023-01-01T00:00:00.000Z`.
///
/// Returns an empty string for out-of-range values; repository reads reject
/// those before they reach callers.
pub fn format_iso_millis(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => String::new(),
    }
}

/// Returns whether an epoch-millisecond value is representable as an instant.
pub fn is_valid_epoch_millis(epoch_ms: i64) -> bool {
    Utc.timestamp_millis_opt(epoch_ms).single().is_some()
}

/// Serde adapter rendering epoch-millisecond fields as ISO-8601 strings in
/// JSON envelopes, matching the wire shape consumed by the frontend.
mod iso_instant {
    use chrono::DateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(epoch_ms: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        let rendered = super::format_iso_millis(*epoch_ms);
        if rendered.is_empty() {
            return Err(serde::ser::Error::custom(format!(
                "epoch milliseconds out of range: {epoch_ms}"
            )));
        }
        serializer.serialize_str(&rendered)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|instant| instant.timestamp_millis())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_iso_millis, NewPerson, PersonValidationError};

    #[test]
    fn validate_checks_fields_in_fixed_order() {
        let empty = NewPerson::default();
        assert_eq!(
            empty.validate(),
            Err(PersonValidationError::MissingFirstName)
        );

        let missing_last = NewPerson {
            first_name: "Ada".to_string(),
            email: Some("not-an-email".to_string()),
            ..NewPerson::default()
        };
        assert_eq!(
            missing_last.validate(),
            Err(PersonValidationError::MissingLastName)
        );
    }

    #[test]
    fn validate_rejects_email_without_at_sign() {
        let person = NewPerson {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada.example.com".to_string()),
            ..NewPerson::default()
        };
        assert_eq!(person.validate(), Err(PersonValidationError::InvalidEmail));
    }

    #[test]
    fn blank_email_is_treated_as_absent() {
        let person = NewPerson {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("   ".to_string()),
            ..NewPerson::default()
        };
        assert_eq!(person.validate(), Ok(()));
        assert_eq!(person.normalized_email(), None);
    }

    #[test]
    fn normalization_trims_names_and_defaults_notes() {
        let person = NewPerson {
            first_name: "  Ada ".to_string(),
            last_name: " Lovelace  ".to_string(),
            email: Some(" ada@example.com ".to_string()),
            notes: None,
        };
        assert_eq!(person.normalized_first_name(), "Ada");
        assert_eq!(person.normalized_last_name(), "Lovelace");
        assert_eq!(person.normalized_email(), Some("ada@example.com"));
        assert_eq!(person.normalized_notes(), "");
    }

    #[test]
    fn format_iso_millis_renders_millisecond_precision() {
        assert_eq!(format_iso_millis(1_672_531_200_000), "2023-01-01T00:00:00.000Z");
        assert_eq!(format_iso_millis(1_672_531_200_123), "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(
            PersonValidationError::MissingFirstName.to_string(),
            "First name is required"
        );
        assert_eq!(
            PersonValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address"
        );
    }
}
