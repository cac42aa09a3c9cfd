//! Snapshot Timeline - browse the governance history of a Snapshot space
//!
//! This library pages through a space's messages (proposals, settings updates,
//! deletions and proposal edits) from the hub's GraphQL API, newest first, and
//! supports drilling into any one of them:
//!
//! - Resolving a message's content document from a gateway
//! - Comparing a settings update with the previous one
//! - Comparing an edited proposal with its original
//! - Filtering the loaded timeline with a small `field:value` language
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use snapshot_timeline::{HubClient, TimelineController};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let hub = HubClient::new("https://hub.snapshot.org/graphql", Duration::from_secs(30))?;
//! let mut timeline = TimelineController::new("alpha.eth", None);
//! let page = timeline.load_next(&hub, 10).await?;
//! println!("Loaded {} events", page.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod diff;
pub mod error;
pub mod filters;
pub mod inspect;
pub mod logging;
pub mod models;
pub mod pager;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use api::{ContentResolver, GatewayResolver, HubClient, MessageQuery, MessageSource};
pub use config::Config;
pub use diff::{Change, Delta, diff_documents};
pub use error::TimelineError;
pub use inspect::{DrilldownKind, DrilldownView, open_drilldown};
pub use models::{EventKind, EventRecord};
pub use pager::{TimelineController, parse_date_cutoff};
