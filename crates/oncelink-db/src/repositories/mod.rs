//! Repository implementations
//!
//! Implementations of the `LinkRepository` trait defined in oncelink-core.

mod error;
mod link;
mod memory;

pub use link::PgLinkRepository;
pub use memory::MemoryLinkRepository;
