//! Integration test utilities for the link service
//!
//! This crate provides helpers for running end-to-end scenarios against
//! the link service over the in-memory store and, when available, PostgreSQL.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
