//! Drill-down workflows for a single timeline record.
//!
//! - **Content**: resolve the record's document and show it as JSON.
//! - **Settings diff**: compare a settings update against the previous one in
//!   the same namespace.
//! - **Proposal diff**: compare an updated proposal against the message that
//!   first created it.
//!
//! Each workflow resolves its documents fresh; nothing is cached between views.

pub mod view;

use serde_json::Value;
use tracing::debug;

pub use view::{DrilldownKind, DrilldownView, ProposalComparison, SettingsComparison};

use crate::api::{ContentResolver, MessageQuery, MessageSource};
use crate::diff::diff_documents;
use crate::error::{Result, TimelineError};
use crate::models::{EventKind, EventRecord};

/// Run the requested drill-down for `record`
pub async fn open_drilldown(
    kind: DrilldownKind,
    source: &dyn MessageSource,
    resolver: &dyn ContentResolver,
    space: &str,
    record: &EventRecord,
) -> Result<DrilldownView> {
    match (kind, record.kind) {
        (DrilldownKind::Content, _) => content_view(resolver, record).await,
        (DrilldownKind::Diff, EventKind::Settings) => {
            settings_comparison(source, resolver, space, record).await.map(DrilldownView::Settings)
        }
        (DrilldownKind::Diff, EventKind::UpdateProposal) => {
            proposal_comparison(source, resolver, space, record).await.map(DrilldownView::Proposal)
        }
        (DrilldownKind::Diff, other) => {
            Err(TimelineError::NotFound(format!("No diff available for {} records", other.label())))
        }
    }
}

/// Resolve the record's document as-is
pub async fn content_view(resolver: &dyn ContentResolver, record: &EventRecord) -> Result<DrilldownView> {
    let document = resolver.resolve(&record.content_ref).await?;
    Ok(DrilldownView::Content {
        content_ref: record.content_ref.clone(),
        url: resolver.content_url(&record.content_ref),
        document,
    })
}

/// Diff a settings update against the most recent settings update before it
pub async fn settings_comparison(
    source: &dyn MessageSource,
    resolver: &dyn ContentResolver,
    space: &str,
    record: &EventRecord,
) -> Result<SettingsComparison> {
    let current_doc = resolver.resolve(&record.content_ref).await?;
    let current = settings_payload(&current_doc)?;

    let previous_records =
        source.fetch_messages(&MessageQuery::previous_settings(space, record.timestamp)).await?;

    let Some(previous_record) = previous_records.into_iter().next() else {
        debug!(space, id = %record.id, "no earlier settings update");
        return Ok(SettingsComparison { current, previous: None, delta: None });
    };

    let previous_doc = resolver.resolve(&previous_record.content_ref).await?;
    let previous = settings_payload(&previous_doc)?;
    let delta = diff_documents(&previous, &current);

    debug!(space, id = %record.id, previous = %previous_record.id, changes = delta.change_count(), "settings compared");
    Ok(SettingsComparison { current, previous: Some((previous_record, previous)), delta: Some(delta) })
}

/// Diff a proposal update against the original proposal message
pub async fn proposal_comparison(
    source: &dyn MessageSource,
    resolver: &dyn ContentResolver,
    space: &str,
    record: &EventRecord,
) -> Result<ProposalComparison> {
    let updated_doc = resolver.resolve(&record.content_ref).await?;
    let updated = envelope_message(&updated_doc)?.clone();

    let proposal_id = updated
        .get("proposal")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| TimelineError::NotFound("No proposal ID found in update message".to_string()))?
        .to_string();

    let related = source.fetch_messages(&MessageQuery::by_id(space, proposal_id.as_str())).await?;
    if related.is_empty() {
        return Err(TimelineError::NotFound("Original proposal not found".to_string()));
    }

    let original_record = related
        .into_iter()
        .find(|m| m.kind == EventKind::Proposal)
        .ok_or_else(|| TimelineError::NotFound("Original proposal message not found".to_string()))?;

    let original_doc = resolver.resolve(&original_record.content_ref).await?;
    let original = envelope_message(&original_doc)?.clone();
    let delta = diff_documents(&original, &updated);

    debug!(space, %proposal_id, changes = delta.change_count(), "proposal compared");
    Ok(ProposalComparison { proposal_id, original, updated, delta })
}

/// `data.message` of a resolved document
pub fn envelope_message(document: &Value) -> Result<&Value> {
    document
        .get("data")
        .and_then(|data| data.get("message"))
        .filter(|message| message.is_object())
        .ok_or_else(|| TimelineError::Malformed("document has no data.message object".to_string()))
}

/// Settings object encoded as a JSON string at `data.message.settings`
pub fn settings_payload(document: &Value) -> Result<Value> {
    let raw = envelope_message(document)?
        .get("settings")
        .ok_or_else(|| TimelineError::Malformed("settings message has no settings field".to_string()))?;

    match raw {
        Value::String(text) => serde_json::from_str(text)
            .map_err(|e| TimelineError::Malformed(format!("settings are not valid JSON: {}", e))),
        // already decoded
        Value::Object(_) => Ok(raw.clone()),
        _ => Err(TimelineError::Malformed("settings field is neither a string nor an object".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_settings_payload_parses_embedded_string() {
        let doc = json!({"data": {"message": {"settings": "{\"name\":\"Alpha\",\"voting\":{\"delay\":0}}"}}});
        assert_eq!(settings_payload(&doc).unwrap(), json!({"name": "Alpha", "voting": {"delay": 0}}));
    }

    #[test]
    fn test_settings_payload_rejects_invalid_json() {
        let doc = json!({"data": {"message": {"settings": "{not json"}}});
        let err = settings_payload(&doc).unwrap_err();
        assert!(matches!(err, TimelineError::Malformed(_)));
    }

    #[test]
    fn test_envelope_message_requires_object() {
        assert!(envelope_message(&json!({"data": {}})).is_err());
        assert!(envelope_message(&json!({"data": {"message": "text"}})).is_err());
        assert_eq!(envelope_message(&json!({"data": {"message": {"a": 1}}})).unwrap(), &json!({"a": 1}));
    }
}
