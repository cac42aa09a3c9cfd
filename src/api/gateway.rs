use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::http_client;
use crate::error::{Result, TimelineError};

/// Proposal pages live on the hub's web front end
const PROPOSAL_BASE_URL: &str = "https://snapshot.box/#/s:";

/// Retrieves immutable JSON documents by content reference
#[async_trait]
pub trait ContentResolver: Send + Sync {
    async fn resolve(&self, content_ref: &str) -> Result<Value>;

    /// Where a reader can open the document in a browser
    fn content_url(&self, content_ref: &str) -> String;
}

/// Content resolver backed by an HTTP gateway of the content-addressed network
#[derive(Debug, Clone)]
pub struct GatewayResolver {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayResolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self { http: http_client(timeout)?, base_url: base_url.into() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ContentResolver for GatewayResolver {
    async fn resolve(&self, content_ref: &str) -> Result<Value> {
        let content_ref = content_ref.trim();
        if content_ref.is_empty() {
            return Err(TimelineError::content(content_ref, "empty content reference"));
        }

        let url = self.content_url(content_ref);
        debug!(%url, "resolving content");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TimelineError::content(content_ref, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimelineError::content(content_ref, format!("HTTP {}", status.as_u16())));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TimelineError::content(content_ref, format!("invalid JSON: {}", e)))
    }

    fn content_url(&self, content_ref: &str) -> String {
        content_url(&self.base_url, content_ref.trim())
    }
}

/// Gateway URL for a content reference
pub fn content_url(base_url: &str, content_ref: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), content_ref)
}

/// Web page of a proposal within its namespace
pub fn proposal_url(space: &str, proposal_id: &str) -> String {
    format!("{}{}/proposal/{}", PROPOSAL_BASE_URL, space.to_lowercase(), proposal_id)
}
