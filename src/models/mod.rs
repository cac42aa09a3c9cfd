//! Data models for governance timeline events.
//!
//! - [`EventRecord`] - One message from the hub's `messages` query
//! - [`EventKind`] - Closed set of message categories shown in the timeline
//!
//! Wire names (`mci`, `type`, `ipfs`) are mapped with serde renames; lenient
//! field readers live in the `deserializers` module.

pub mod deserializers;
pub mod event;

pub use event::{EventKind, EventRecord};
