//! Clients for the two external services the timeline reads from.
//!
//! - [`hub`] - GraphQL `messages` queries against the governance hub ([`MessageSource`])
//! - [`gateway`] - Content-addressed document retrieval over HTTP ([`ContentResolver`])
//! - [`query`] - The query document and its variables
//!
//! Both clients sit behind traits so the pager and the drill-down views can be
//! exercised against scripted sources in tests.

pub mod gateway;
pub mod hub;
pub mod query;

use std::time::Duration;

pub use gateway::{ContentResolver, GatewayResolver, content_url, proposal_url};
pub use hub::{HubClient, MessageSource};
pub use query::MessageQuery;

use crate::error::{Result, TimelineError};

const USER_AGENT: &str = concat!("snapshot-timeline/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used by both services
fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| TimelineError::Config(format!("failed to build HTTP client: {}", e)))
}
