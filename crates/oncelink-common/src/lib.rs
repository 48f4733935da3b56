//! # oncelink-common
//!
//! Shared utilities: layered configuration and tracing setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, LinkConfig};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
