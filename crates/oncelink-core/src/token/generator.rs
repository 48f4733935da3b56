//! Unguessable link tokens
//!
//! Tokens are drawn uniformly from a 62-symbol alphanumeric alphabet using the
//! operating system CSPRNG. At the minimum length of 32 that is ~190 bits.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

use crate::error::DomainError;

/// Symbols a token may contain
pub const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Shortest token this crate will issue or accept
pub const MIN_TOKEN_LENGTH: usize = 32;

/// Source of link tokens
///
/// The store's uniqueness constraint is the authority on collisions; a
/// generator only has to make them vanishingly rare.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// OS-entropy backed generator
#[derive(Debug, Clone, Copy)]
pub struct SecureTokenGenerator {
    length: usize,
}

impl SecureTokenGenerator {
    /// Create a generator for tokens of `length` characters
    ///
    /// # Errors
    /// Returns `DomainError::ValidationError` if `length` is below [`MIN_TOKEN_LENGTH`]
    pub fn new(length: usize) -> Result<Self, DomainError> {
        if length < MIN_TOKEN_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "token length must be at least {MIN_TOKEN_LENGTH}, got {length}"
            )));
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for SecureTokenGenerator {
    fn default() -> Self {
        Self {
            length: MIN_TOKEN_LENGTH,
        }
    }
}

impl TokenGenerator for SecureTokenGenerator {
    fn generate(&self) -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Generate a token of the default length
pub fn generate_token() -> String {
    SecureTokenGenerator::default().generate()
}

/// Cheap shape check before going to the store
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LENGTH && token.bytes().all(|b| TOKEN_ALPHABET.contains(&b))
}

/// Leading characters of a token, safe to put in logs
pub fn token_hint(token: &str) -> &str {
    token.char_indices().nth(6).map_or(token, |(i, _)| &token[..i])
}
