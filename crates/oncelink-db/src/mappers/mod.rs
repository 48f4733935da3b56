//! Entity to model mappers
//!
//! - `TryFrom<LinkModel> for LinkRecord`: Convert database rows to domain objects
//! - `LinkInsert`: Prepare entity data for insertion

mod link;

pub use link::{records_from_models, LinkInsert};
