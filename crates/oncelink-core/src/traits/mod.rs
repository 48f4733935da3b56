//! Repository traits (ports)

mod repositories;

pub use repositories::{LinkRepository, RepoResult};
