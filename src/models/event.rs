use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// Category of a governance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Proposal,
    Settings,
    DeleteProposal,
    UpdateProposal,
}

impl EventKind {
    pub const ALL: [EventKind; 4] =
        [EventKind::Proposal, EventKind::Settings, EventKind::DeleteProposal, EventKind::UpdateProposal];

    /// Name used on the wire and in GraphQL `type_in` filters
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Proposal => "proposal",
            EventKind::Settings => "settings",
            EventKind::DeleteProposal => "delete-proposal",
            EventKind::UpdateProposal => "update-proposal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Proposal => "New Proposal",
            EventKind::Settings => "Settings Update",
            EventKind::DeleteProposal => "Proposal Deleted",
            EventKind::UpdateProposal => "Proposal Updated",
        }
    }

    /// Whether a structural diff view exists for this kind
    pub fn has_diff(&self) -> bool {
        matches!(self, EventKind::Settings | EventKind::UpdateProposal)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = TimelineError;

    /// Accepts wire names plus the short forms `new`, `delete` and `update`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "proposal" | "new" => Ok(EventKind::Proposal),
            "settings" => Ok(EventKind::Settings),
            "delete-proposal" | "delete" => Ok(EventKind::DeleteProposal),
            "update-proposal" | "update" => Ok(EventKind::UpdateProposal),
            _ => Err(TimelineError::Malformed(format!("unknown event kind: '{}'", s))),
        }
    }
}

/// One entry of the timeline, as returned by the hub's `messages` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(
        rename = "mci",
        default,
        deserialize_with = "crate::models::deserializers::deserialize_sequence_index"
    )]
    pub sequence_index: u64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(rename = "ipfs")]
    pub content_ref: String,
    #[serde(deserialize_with = "crate::models::deserializers::deserialize_epoch_seconds")]
    pub timestamp: i64,
}

impl EventRecord {
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }
}
