//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    /// No record for the id or token, or the record belongs to someone else
    #[error("Link not found")]
    LinkNotFound,

    // =========================================================================
    // Consumption Errors
    // =========================================================================
    #[error("Link has already been consumed")]
    AlreadyConsumed,

    #[error("Link has expired")]
    Expired,

    // =========================================================================
    // State Errors
    // =========================================================================
    #[error("Cannot {action} a link that is {state}")]
    InvalidState {
        state: &'static str,
        action: &'static str,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Token Errors
    // =========================================================================
    #[error("Link token already exists")]
    DuplicateToken,

    #[error("Could not generate a unique token after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Store operation timed out")]
    StoreTimeout,
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::LinkNotFound => "LINK_NOT_FOUND",
            Self::AlreadyConsumed => "LINK_ALREADY_CONSUMED",
            Self::Expired => "LINK_EXPIRED",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DuplicateToken => "DUPLICATE_TOKEN",
            Self::GenerationExhausted { .. } => "TOKEN_GENERATION_EXHAUSTED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StoreTimeout => "STORE_TIMEOUT",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LinkNotFound)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if the current state of the link rejected the operation
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyConsumed | Self::Expired | Self::InvalidState { .. }
        )
    }

    /// Check if retrying the operation may succeed
    ///
    /// A retried consume can still observe `AlreadyConsumed` if the first
    /// attempt committed before its response was lost.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::StoreTimeout)
    }
}
