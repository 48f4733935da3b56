//! Business logic services
//!
//! This module contains the link service and the context and error types
//! it is built on.

pub mod context;
pub mod error;
pub mod link;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use link::LinkService;
