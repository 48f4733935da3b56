//! Database models - SQLx-compatible structs for PostgreSQL tables

mod link;

pub use link::LinkModel;
