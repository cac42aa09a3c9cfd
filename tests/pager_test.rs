//! Pagination against an in-memory hub

mod common;

use common::{RecordBuilder, ScriptedSource, descending_records};
use pretty_assertions::assert_eq;
use snapshot_timeline::models::{EventKind, EventRecord};
use snapshot_timeline::pager::{PageOutcome, PagerState, TimelineController, parse_date_cutoff};

fn ids(records: &[EventRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_two_pages_then_exhausted() {
    let source = ScriptedSource::new().with_space("alpha.eth", descending_records(14, 1000));
    let mut timeline = TimelineController::new("alpha.eth", None);

    let first = timeline.load_next(&source, 10).await.unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(timeline.cursor().last_seen_timestamp, Some(991));
    assert!(!timeline.is_exhausted());

    let second = timeline.load_next(&source, 10).await.unwrap();
    assert_eq!(second.len(), 4);
    assert!(timeline.is_exhausted());
    assert_eq!(timeline.records().len(), 14);

    // No further queries once exhausted
    assert!(timeline.load_next(&source, 10).await.unwrap().is_empty());
    let queries = source.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].timestamp_lt, None);
    assert_eq!(queries[1].timestamp_lt, Some(991));
}

#[tokio::test]
async fn test_date_cutoff_bounds_first_page() {
    let source = ScriptedSource::new().with_space("alpha.eth", descending_records(1000, 999));
    let mut timeline = TimelineController::new("alpha.eth", parse_date_cutoff("500").unwrap());

    let page = timeline.load_next(&source, 10).await.unwrap();
    assert_eq!(page.first().map(|r| r.timestamp), Some(499));
    assert!(page.iter().all(|r| r.timestamp < 500));
    assert_eq!(source.queries()[0].timestamp_lt, Some(500));
}

#[tokio::test]
async fn test_reset_reproduces_first_page() {
    let source = ScriptedSource::new()
        .with_space("alpha.eth", descending_records(25, 2000))
        .with_space("beta.eth", descending_records(3, 50));
    let mut timeline = TimelineController::new("alpha.eth", None);

    let original = timeline.load_next(&source, 10).await.unwrap();
    timeline.load_next(&source, 10).await.unwrap();

    timeline.reset("beta.eth", None);
    assert!(timeline.records().is_empty());
    assert_eq!(timeline.cursor().last_seen_timestamp, None);
    timeline.load_next(&source, 10).await.unwrap();
    assert_eq!(timeline.records().len(), 3);
    assert!(timeline.is_exhausted());

    timeline.reset("alpha.eth", None);
    let again = timeline.load_next(&source, 10).await.unwrap();
    assert_eq!(ids(&again), ids(&original));
}

#[tokio::test]
async fn test_stream_is_descending_without_duplicates() {
    let mut records = descending_records(37, 10_000);
    records.push(RecordBuilder::new("0xsettings", EventKind::Settings, 9_950).build());
    let source = ScriptedSource::new().with_space("alpha.eth", records);
    let mut timeline = TimelineController::new("alpha.eth", None);

    while !timeline.is_exhausted() {
        timeline.load_next(&source, 7).await.unwrap();
    }

    let loaded = timeline.records();
    assert_eq!(loaded.len(), 38);
    assert!(loaded.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    let mut unique: Vec<&str> = ids(loaded);
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), loaded.len());
}

#[tokio::test]
async fn test_failed_page_keeps_cursor_and_list() {
    let source = ScriptedSource::new().with_space("alpha.eth", descending_records(30, 300));
    let mut timeline = TimelineController::new("alpha.eth", None);
    timeline.load_next(&source, 10).await.unwrap();

    source.fail("hub unavailable");
    let err = timeline.load_next(&source, 10).await.unwrap_err();
    assert!(err.to_string().contains("hub unavailable"));
    assert_eq!(timeline.records().len(), 10);
    assert_eq!(timeline.state(), PagerState::Idle);
    assert_eq!(timeline.cursor().last_seen_timestamp, Some(291));

    source.recover();
    let retry = timeline.load_next(&source, 10).await.unwrap();
    assert_eq!(retry.first().map(|r| r.timestamp), Some(290));
}

#[test]
fn test_single_request_in_flight() {
    let mut timeline = TimelineController::new("alpha.eth", None);
    let request = timeline.begin_load(10).unwrap();
    assert!(timeline.is_loading());
    assert!(timeline.begin_load(10).is_none());

    let outcome = timeline.complete(request.generation, Ok(descending_records(10, 100)));
    assert!(matches!(outcome, PageOutcome::Loaded { exhausted: false, .. }));
    assert!(timeline.begin_load(10).is_some());
}

#[test]
fn test_response_after_reset_is_dropped() {
    let mut timeline = TimelineController::new("alpha.eth", None);
    let stale = timeline.begin_load(10).unwrap();

    timeline.reset("beta.eth", None);
    let fresh = timeline.begin_load(10).unwrap();

    let outcome = timeline.complete(stale.generation, Ok(descending_records(10, 100)));
    assert!(matches!(outcome, PageOutcome::Stale));
    assert!(timeline.records().is_empty());
    assert!(timeline.is_loading());

    let outcome = timeline.complete(fresh.generation, Ok(descending_records(2, 100)));
    assert!(matches!(outcome, PageOutcome::Loaded { exhausted: true, .. }));
    assert_eq!(timeline.records().len(), 2);
}

#[tokio::test]
async fn test_empty_namespace_issues_no_query() {
    let source = ScriptedSource::new();
    let mut timeline = TimelineController::new("", None);
    assert!(timeline.load_next(&source, 10).await.unwrap().is_empty());
    assert!(source.queries().is_empty());
}
