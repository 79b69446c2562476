//! Command and event abstractions shared by the domain crates.

pub mod command;
pub mod event;

pub use command::Command;
pub use event::{Event, EventMetadata};
