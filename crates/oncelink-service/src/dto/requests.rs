//! Request DTOs for the link service
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

use oncelink_core::entities::{LinkPatch, LinkRecord, LinkState, MAX_TITLE_CHARS};

/// Reject strings that are empty once whitespace is removed
fn require_content(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    message: &'static str,
) {
    if value.is_some_and(|v| v.trim().is_empty()) {
        errors.add(field, ValidationError::new("blank").with_message(message.into()));
    }
}

/// Titles are counted in characters, not bytes
fn limit_title(errors: &mut ValidationErrors, title: Option<&str>) {
    if title.is_some_and(|t| t.chars().count() > MAX_TITLE_CHARS) {
        let message = format!("Title must be at most {MAX_TITLE_CHARS} characters");
        errors.add("title", ValidationError::new("length").with_message(message.into()));
    }
}

/// Run derive rules, then the rules the derive cannot express
fn validate_all<T: Validate>(
    request: &T,
    title: Option<&str>,
    payload: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = match request.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    limit_title(&mut errors, title);
    require_content(&mut errors, "title", title, "Title is required");
    require_content(&mut errors, "payload", payload, "Payload is required");

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// Link Requests
// ============================================================================

/// Create link request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Payload is required"))]
    pub payload: String,

    /// Optional hard deadline; a past value creates an already-expired link
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateLinkRequest {
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            payload: payload.into(),
            expires_at: None,
        }
    }

    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Validate lengths and reject blank title or payload
    pub fn validate_content(&self) -> Result<(), ValidationErrors> {
        validate_all(self, Some(&self.title), Some(&self.payload))
    }
}

/// Update link request
///
/// Absent fields are left alone. For `expires_at`, an explicit `null`
/// clears the deadline while omitting the key keeps it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Payload is required"))]
    pub payload: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateLinkRequest {
    /// Validate lengths and reject blank title or payload
    pub fn validate_content(&self) -> Result<(), ValidationErrors> {
        validate_all(self, self.title.as_deref(), self.payload.as_deref())
    }

    pub fn into_patch(self) -> LinkPatch {
        LinkPatch {
            title: self.title,
            payload: self.payload,
            expires_at: self.expires_at,
        }
    }
}

/// Distinguish a missing key (outer `None`) from an explicit null (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Which of an owner's links to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkFilter {
    #[default]
    All,
    /// Openable right now: active, unexpired, not trashed
    Active,
    /// Consumed or expired, not trashed
    Inactive,
    Trashed,
}

impl LinkFilter {
    pub fn matches(self, record: &LinkRecord, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Active => record.is_consumable_at(now),
            Self::Inactive => match record.state() {
                LinkState::Consumed => true,
                LinkState::Active => record.is_expired_at(now),
                LinkState::Trashed => false,
            },
            Self::Trashed => record.is_trashed(),
        }
    }
}
