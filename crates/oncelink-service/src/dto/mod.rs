//! Data transfer objects for service requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for caller inputs
//! - Response DTOs for owner-facing and public outputs

pub mod requests;
pub mod responses;

pub use requests::{CreateLinkRequest, LinkFilter, UpdateLinkRequest};
pub use responses::{LinkResponse, LinkStatsResponse, OneTimeView};
