use serde_json::{Map, Value, json};

use crate::models::EventKind;

/// GraphQL document for the hub's `messages` collection, newest first.
///
/// Variables that are absent from the request leave the matching `where`
/// clause unconstrained.
pub const MESSAGES_QUERY: &str = r#"query GetMessages($space: String!, $first: Int!, $skip: Int!, $timestamp_lt: Int, $types: [String], $id: String) {
  messages(
    first: $first
    skip: $skip
    where: { space: $space, type_in: $types, timestamp_lt: $timestamp_lt, id: $id }
    orderBy: "timestamp"
    orderDirection: desc
  ) {
    id
    mci
    type
    ipfs
    timestamp
  }
}"#;

/// Parameters of one `messages` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub space: String,
    pub first: usize,
    /// Result offset; always 0 on the cursor path
    pub skip: usize,
    /// Exclusive upper bound on `timestamp`
    pub timestamp_lt: Option<i64>,
    pub kinds: Vec<EventKind>,
    pub id: Option<String>,
}

impl MessageQuery {
    /// A timeline page: every kind, at most `first` records older than `timestamp_lt`
    pub fn page(space: impl Into<String>, first: usize, timestamp_lt: Option<i64>) -> Self {
        Self {
            space: space.into(),
            first,
            skip: 0,
            timestamp_lt,
            kinds: EventKind::ALL.to_vec(),
            id: None,
        }
    }

    /// The most recent settings update strictly older than `before`
    pub fn previous_settings(space: impl Into<String>, before: i64) -> Self {
        Self {
            space: space.into(),
            first: 1,
            skip: 0,
            timestamp_lt: Some(before),
            kinds: vec![EventKind::Settings],
            id: None,
        }
    }

    /// All timeline messages carrying the given id
    pub fn by_id(space: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            first: 10,
            skip: 0,
            timestamp_lt: None,
            kinds: EventKind::ALL.to_vec(),
            id: Some(id.into()),
        }
    }

    /// GraphQL variables; `None` fields are omitted rather than sent as null
    pub fn variables(&self) -> Value {
        let mut vars = Map::new();
        vars.insert("space".to_string(), json!(self.space));
        vars.insert("first".to_string(), json!(self.first));
        vars.insert("skip".to_string(), json!(self.skip));
        vars.insert(
            "types".to_string(),
            Value::Array(self.kinds.iter().map(|k| json!(k.as_str())).collect()),
        );
        if let Some(ts) = self.timestamp_lt {
            vars.insert("timestamp_lt".to_string(), json!(ts));
        }
        if let Some(ref id) = self.id {
            vars.insert("id".to_string(), json!(id));
        }
        Value::Object(vars)
    }

    /// Full request body for the GraphQL endpoint
    pub fn request_body(&self) -> Value {
        json!({ "query": MESSAGES_QUERY, "variables": self.variables() })
    }
}
