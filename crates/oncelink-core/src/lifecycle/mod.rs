//! Link lifecycle rules

mod machine;

pub use machine::{check_transition, LinkEvent, Transition};
