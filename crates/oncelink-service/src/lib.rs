//! # oncelink-service
//!
//! Application layer: the link service facade called by the surrounding
//! product, its request/response DTOs, and the dependency container.

pub mod dto;
pub mod services;

pub use dto::{
    CreateLinkRequest, LinkFilter, LinkResponse, LinkStatsResponse, OneTimeView,
    UpdateLinkRequest,
};
pub use services::{LinkService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
