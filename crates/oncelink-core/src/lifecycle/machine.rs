//! Lifecycle state machine
//!
//! | From              | Event   | To                     | Guard                        |
//! |-------------------|---------|------------------------|------------------------------|
//! | Active            | consume | Consumed               | not expired, not trashed     |
//! | Active / Consumed | trash   | Trashed                | no-op if already trashed     |
//! | Trashed           | restore | prior status           | no-op if not trashed         |
//! | any               | purge   | removed                | none                         |
//! | Active            | edit    | Active                 | not expired, not trashed     |
//!
//! Expiry is evaluated against the supplied clock reading, never stored.
//! Ownership is checked by the caller before a record gets here.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::entities::{LinkRecord, LinkState};
use crate::error::DomainError;

/// Caller-visible mutation of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkEvent {
    Consume,
    Trash,
    Restore,
    Edit,
    Purge,
}

impl LinkEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consume => "consume",
            Self::Trash => "trash",
            Self::Restore => "restore",
            Self::Edit => "edit",
            Self::Purge => "purge",
        }
    }
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a permitted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The record changes
    Apply,
    /// The record is already where the event would take it
    Unchanged,
}

/// Validate `event` against the record's current state at `now`
pub fn check_transition(
    record: &LinkRecord,
    event: LinkEvent,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    match event {
        LinkEvent::Consume => match record.state() {
            // Trashed links are invisible on the public path.
            LinkState::Trashed => Err(DomainError::LinkNotFound),
            LinkState::Consumed => Err(DomainError::AlreadyConsumed),
            LinkState::Active if record.is_expired_at(now) => Err(DomainError::Expired),
            LinkState::Active => Ok(Transition::Apply),
        },
        LinkEvent::Trash => Ok(if record.is_trashed() {
            Transition::Unchanged
        } else {
            Transition::Apply
        }),
        LinkEvent::Restore => Ok(if record.is_trashed() {
            Transition::Apply
        } else {
            Transition::Unchanged
        }),
        LinkEvent::Edit => match record.state() {
            LinkState::Active if record.is_expired_at(now) => Err(DomainError::InvalidState {
                state: "expired",
                action: event.as_str(),
            }),
            LinkState::Active => Ok(Transition::Apply),
            state @ (LinkState::Consumed | LinkState::Trashed) => Err(DomainError::InvalidState {
                state: state.as_str(),
                action: event.as_str(),
            }),
        },
        LinkEvent::Purge => Ok(Transition::Apply),
    }
}
