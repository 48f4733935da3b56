//! Domain entities - core business objects

mod link;

pub use link::{LinkPatch, LinkRecord, LinkState, LinkStatus, NewLink, MAX_TITLE_CHARS};
