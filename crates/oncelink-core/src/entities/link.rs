//! Link entity - a stored document exposed once through an unguessable token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{LinkId, OwnerId};

/// Maximum title length in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// Persisted consumption status of a link
///
/// Trashing is tracked separately through `deleted_at`, so a trashed link
/// keeps whichever status it had before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Consumed,
}

impl LinkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Consumed => "consumed",
        }
    }

    /// Parse the database representation
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "consumed" => Some(Self::Consumed),
            _ => None,
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective lifecycle state as seen by callers
///
/// `Trashed` masks the stored status while `deleted_at` is set. Expiry is not
/// a state; see [`LinkRecord::is_expired_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Active,
    Consumed,
    Trashed,
}

impl LinkState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Consumed => "consumed",
            Self::Trashed => "trashed",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link record entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: LinkId,
    pub owner_id: OwnerId,
    pub token: String,
    pub title: String,
    pub payload: String,
    pub status: LinkStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub access_count: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkRecord {
    /// Materialize a new record from insert data, as a store does on first persistence
    pub fn from_new(id: LinkId, link: &NewLink, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: link.owner_id,
            token: link.token.clone(),
            title: link.title.clone(),
            payload: link.payload.clone(),
            status: LinkStatus::Active,
            expires_at: link.expires_at,
            consumed_at: None,
            access_count: 0,
            deleted_at: None,
            created_at,
        }
    }

    /// Effective state, with trash taking precedence over the stored status
    pub fn state(&self) -> LinkState {
        if self.is_trashed() {
            LinkState::Trashed
        } else {
            match self.status {
                LinkStatus::Active => LinkState::Active,
                LinkStatus::Consumed => LinkState::Consumed,
            }
        }
    }

    #[inline]
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.status == LinkStatus::Consumed
    }

    /// Check expiry against an explicit clock reading
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Check if the link is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether a consume at `now` would succeed
    pub fn is_consumable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == LinkStatus::Active && !self.is_trashed() && !self.is_expired_at(now)
    }

    /// Apply the Active -> Consumed transition
    ///
    /// Callers must have checked the guard first; stores do both under one lock
    /// or in one conditional statement.
    pub fn mark_consumed(&mut self, now: DateTime<Utc>) {
        self.status = LinkStatus::Consumed;
        self.consumed_at = Some(now);
        self.access_count += 1;
    }

    /// Public URL for the link under the given base URL
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/link/{}", base_url.trim_end_matches('/'), self.token)
    }
}

/// Data needed to persist a new link; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub owner_id: OwnerId,
    pub token: String,
    pub title: String,
    pub payload: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLink {
    pub fn new(owner_id: OwnerId, token: String, title: String, payload: String) -> Self {
        Self {
            owner_id,
            token,
            title,
            payload,
            expires_at: None,
        }
    }

    pub fn with_expiration(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }
}

/// Partial update of the editable fields
///
/// `expires_at: Some(None)` clears the deadline; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub payload: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.payload.is_none() && self.expires_at.is_none()
    }

    /// Write the patched fields into a record, leaving everything else alone
    pub fn apply_to(&self, record: &mut LinkRecord) {
        if let Some(title) = &self.title {
            record.title.clone_from(title);
        }
        if let Some(payload) = &self.payload {
            record.payload.clone_from(payload);
        }
        if let Some(expires_at) = self.expires_at {
            record.expires_at = expires_at;
        }
    }
}
