//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use chrono::{Duration, Utc};
use oncelink_service::{CreateLinkRequest, UpdateLinkRequest};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Link with a unique title and a small markup payload
pub fn unique_link() -> CreateLinkRequest {
    let suffix = unique_suffix();
    CreateLinkRequest::new(
        format!("Test Link {suffix}"),
        format!("<h1>Secret {suffix}</h1>"),
    )
}

/// Link whose deadline passed one second ago
pub fn expired_link() -> CreateLinkRequest {
    unique_link().with_expiration(Utc::now() - Duration::seconds(1))
}

/// Link that stays open for an hour
pub fn expiring_link() -> CreateLinkRequest {
    unique_link().with_expiration(Utc::now() + Duration::hours(1))
}

pub fn rename(title: impl Into<String>) -> UpdateLinkRequest {
    UpdateLinkRequest {
        title: Some(title.into()),
        ..UpdateLinkRequest::default()
    }
}

pub fn replace_payload(payload: impl Into<String>) -> UpdateLinkRequest {
    UpdateLinkRequest {
        payload: Some(payload.into()),
        ..UpdateLinkRequest::default()
    }
}
