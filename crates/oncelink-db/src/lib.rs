//! # oncelink-db
//!
//! Store layer implementing [`LinkRepository`](oncelink_core::LinkRepository).
//!
//! ## Overview
//!
//! - [`PgLinkRepository`]: PostgreSQL via SQLx. Consumption is a single
//!   conditional `UPDATE ... RETURNING`, so the guarantee holds across
//!   processes and machines sharing the database.
//! - [`MemoryLinkRepository`]: in-process store for tests and embedding;
//!   consumption runs under the record's map entry lock.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oncelink_common::DatabaseConfig;
//! use oncelink_db::{create_pool, run_migrations, PgLinkRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let links = PgLinkRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, PgPool};
pub use repositories::{MemoryLinkRepository, PgLinkRepository};
