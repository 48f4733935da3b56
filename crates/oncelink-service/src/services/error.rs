//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use oncelink_core::DomainError;
use std::fmt;
use validator::ValidationErrors;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Public consume failed; deliberately says nothing about why
    LinkUnavailable,

    /// Validation error
    Validation(String),

    /// A store call did not finish in time
    Timeout { operation: &'static str },

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::LinkUnavailable => write!(f, "This link is not available"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Timeout { operation } => write!(f, "Timed out during {operation}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(operation: &'static str) -> Self {
        Self::Timeout { operation }
    }

    /// Get the error code for callers
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::LinkUnavailable => "LINK_UNAVAILABLE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_transient(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => Self::Validation(msg),
            other => Self::Domain(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join("; "))
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
