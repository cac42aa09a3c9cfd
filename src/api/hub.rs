use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http_client;
use super::query::MessageQuery;
use crate::error::{Result, TimelineError};
use crate::models::EventRecord;

/// Source of timeline pages (implemented by [`HubClient`], scripted in tests)
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Run one `messages` query; records come back sorted by timestamp, newest first
    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<EventRecord>>;
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<MessagesData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct MessagesData {
    #[serde(default)]
    messages: Option<Vec<EventRecord>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// GraphQL client for the governance hub
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HubClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self { http: http_client(timeout)?, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl MessageSource for HubClient {
    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<EventRecord>> {
        debug!(
            space = %query.space,
            first = query.first,
            timestamp_lt = ?query.timestamp_lt,
            id = ?query.id,
            "querying hub messages"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&query.request_body())
            .send()
            .await
            .map_err(|e| TimelineError::Query(format!("request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimelineError::Query(format!("hub responded with HTTP {}", status)));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| TimelineError::Query(format!("invalid hub response: {}", e)))?;

        if !body.errors.is_empty() {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            warn!(errors = ?messages, "hub returned GraphQL errors");
            return Err(TimelineError::Query(messages.join("; ")));
        }

        let records = body
            .data
            .ok_or_else(|| TimelineError::Query("hub response contained no data".to_string()))?
            .messages
            .unwrap_or_default();

        debug!(count = records.len(), "hub returned messages");
        Ok(records)
    }
}
