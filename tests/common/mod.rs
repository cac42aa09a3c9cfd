//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use snapshot_timeline::api::{ContentResolver, MessageQuery, MessageSource};
use snapshot_timeline::error::{Result, TimelineError};
use snapshot_timeline::models::{EventKind, EventRecord};

/// Builder for a single timeline record
pub struct RecordBuilder {
    record: EventRecord,
}

impl RecordBuilder {
    pub fn new(id: &str, kind: EventKind, timestamp: i64) -> Self {
        Self {
            record: EventRecord {
                id: id.to_string(),
                sequence_index: 0,
                kind,
                content_ref: format!("bafy-{}", id),
                timestamp,
            },
        }
    }

    pub fn content_ref(mut self, content_ref: &str) -> Self {
        self.record.content_ref = content_ref.to_string();
        self
    }

    pub fn build(self) -> EventRecord {
        self.record
    }
}

/// `count` proposals with timestamps `start`, `start - 1`, ...
pub fn descending_records(count: usize, start: i64) -> Vec<EventRecord> {
    (0..count)
        .map(|i| RecordBuilder::new(&format!("0x{:04}", i), EventKind::Proposal, start - i as i64).build())
        .collect()
}

/// In-memory hub: answers queries over a fixed record set the way the real
/// hub does (space, kind, id and cutoff constraints, newest first, `first` cap)
pub struct ScriptedSource {
    spaces: HashMap<String, Vec<EventRecord>>,
    queries: Mutex<Vec<MessageQuery>>,
    fail_with: Mutex<Option<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self { spaces: HashMap::new(), queries: Mutex::new(Vec::new()), fail_with: Mutex::new(None) }
    }

    pub fn with_space(mut self, space: &str, mut records: Vec<EventRecord>) -> Self {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.spaces.insert(space.to_string(), records);
        self
    }

    /// Make every following query fail with a query error
    pub fn fail(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn recover(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    pub fn queries(&self) -> Vec<MessageQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<EventRecord>> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(TimelineError::Query(message));
        }

        let records = self.spaces.get(&query.space).map(Vec::as_slice).unwrap_or_default();
        Ok(records
            .iter()
            .filter(|r| query.timestamp_lt.is_none_or(|ts| r.timestamp < ts))
            .filter(|r| query.kinds.contains(&r.kind))
            .filter(|r| query.id.as_ref().is_none_or(|id| &r.id == id))
            .skip(query.skip)
            .take(query.first)
            .cloned()
            .collect())
    }
}

/// Content resolver over a fixed map of documents
pub struct FakeResolver {
    documents: HashMap<String, Value>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self { documents: HashMap::new() }
    }

    pub fn with(mut self, content_ref: &str, document: Value) -> Self {
        self.documents.insert(content_ref.to_string(), document);
        self
    }
}

#[async_trait]
impl ContentResolver for FakeResolver {
    async fn resolve(&self, content_ref: &str) -> Result<Value> {
        self.documents
            .get(content_ref)
            .cloned()
            .ok_or_else(|| TimelineError::content(content_ref, "HTTP 404"))
    }

    fn content_url(&self, content_ref: &str) -> String {
        format!("https://gateway.test/ipfs/{}", content_ref)
    }
}

/// Envelope of a settings message with its settings serialized as a string
pub fn settings_envelope(settings: Value) -> Value {
    json!({ "data": { "message": { "space": "alpha.eth", "settings": settings.to_string() } } })
}

/// Envelope of a proposal message
pub fn proposal_envelope(message: Value) -> Value {
    json!({ "data": { "message": message } })
}
