//! # oncelink-core
//!
//! Domain layer for single-use links: the link entity, token generation,
//! lifecycle rules, and the store trait the infrastructure layer implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod token;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{LinkPatch, LinkRecord, LinkState, LinkStatus, NewLink, MAX_TITLE_CHARS};
pub use error::DomainError;
pub use lifecycle::{check_transition, LinkEvent, Transition};
pub use token::{
    generate_token, is_well_formed_token, token_hint, SecureTokenGenerator, TokenGenerator,
    MIN_TOKEN_LENGTH, TOKEN_ALPHABET,
};
pub use traits::{LinkRepository, RepoResult};
pub use value_objects::{IdParseError, LinkId, OwnerId};
