//! Link token generation

mod generator;

pub use generator::{
    generate_token, is_well_formed_token, token_hint, SecureTokenGenerator, TokenGenerator,
    MIN_TOKEN_LENGTH, TOKEN_ALPHABET,
};
