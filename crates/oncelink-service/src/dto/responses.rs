//! Response DTOs for link operations
//!
//! All response DTOs implement `Serialize`. Owner-facing responses carry the
//! full record; the public view carries only what the recipient may see.

use chrono::{DateTime, Utc};
use serde::Serialize;

use oncelink_core::entities::{LinkRecord, LinkState};
use oncelink_core::value_objects::LinkId;

use super::requests::LinkFilter;

// ============================================================================
// Owner Responses
// ============================================================================

/// A link as its owner sees it
#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    pub id: LinkId,
    pub token: String,
    pub title: String,
    pub payload: String,
    pub url: String,
    pub state: LinkState,
    /// Past its deadline at the time the response was built
    pub expired: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub access_count: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_warning: Option<String>,
}

impl LinkResponse {
    pub fn from_record(record: LinkRecord, base_url: &str, now: DateTime<Utc>) -> Self {
        Self {
            url: record.url(base_url),
            state: record.state(),
            expired: record.is_expired_at(now),
            id: record.id,
            token: record.token,
            title: record.title,
            payload: record.payload,
            expires_at: record.expires_at,
            consumed_at: record.consumed_at,
            access_count: record.access_count,
            deleted_at: record.deleted_at,
            created_at: record.created_at,
            payload_warning: None,
        }
    }

    /// Flag payloads longer than `limit` characters
    pub fn with_payload_limit(mut self, limit: usize) -> Self {
        let chars = self.payload.chars().count();
        if chars > limit {
            self.payload_warning = Some(format!(
                "Payload is {chars} characters; content over {limit} characters may load slowly"
            ));
        }
        self
    }
}

/// Per-owner counts by filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStatsResponse {
    pub active: u64,
    pub inactive: u64,
    pub trashed: u64,
    /// Links outside the trash
    pub total: u64,
}

impl LinkStatsResponse {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a LinkRecord>, now: DateTime<Utc>) -> Self {
        let mut stats = Self::default();
        for record in records {
            if LinkFilter::Trashed.matches(record, now) {
                stats.trashed += 1;
                continue;
            }
            stats.total += 1;
            if LinkFilter::Active.matches(record, now) {
                stats.active += 1;
            } else if LinkFilter::Inactive.matches(record, now) {
                stats.inactive += 1;
            }
        }
        stats
    }
}

// ============================================================================
// Public Responses
// ============================================================================

/// What the recipient of a link gets on its single successful open
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneTimeView {
    pub title: String,
    pub payload: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRecord> for OneTimeView {
    fn from(record: LinkRecord) -> Self {
        Self {
            title: record.title,
            payload: record.payload,
            expires_at: record.expires_at,
        }
    }
}
