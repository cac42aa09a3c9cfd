//! Integration tests for filter functionality

mod common;

use common::RecordBuilder;
use snapshot_timeline::filters::apply::apply_filters;
use snapshot_timeline::filters::parser::parse_filter;
use snapshot_timeline::models::{EventKind, EventRecord};

fn timeline() -> Vec<EventRecord> {
    vec![
        RecordBuilder::new("0xA1", EventKind::UpdateProposal, 1_717_200_000).build(), // 2024-06-01
        RecordBuilder::new("0xB2", EventKind::Settings, 1_714_521_600).build(), // 2024-05-01
        RecordBuilder::new("0xC3", EventKind::Proposal, 1_704_067_200).build(), // 2024-01-01
        RecordBuilder::new("0xD4", EventKind::DeleteProposal, 1_672_531_200).build(), // 2023-01-01
        RecordBuilder::new("0xE5", EventKind::Settings, 1_609_459_200).build(), // 2021-01-01
    ]
}

fn ids(records: Vec<&EventRecord>) -> Vec<&str> {
    records.into_iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn test_filter_integration_kind() {
    let records = timeline();
    let filter = parse_filter("kind:settings").expect("Parse filter");
    assert_eq!(ids(apply_filters(&records, &filter)), vec!["0xB2", "0xE5"]);
}

#[test]
fn test_filter_integration_type_alias() {
    let records = timeline();
    let filter = parse_filter("type:delete-proposal").expect("Parse filter");
    assert_eq!(ids(apply_filters(&records, &filter)), vec!["0xD4"]);
}

#[test]
fn test_filter_integration_combined() {
    let records = timeline();
    let filter = parse_filter("kind:settings since:2024-01-01").expect("Parse filter");
    assert_eq!(ids(apply_filters(&records, &filter)), vec!["0xB2"]);
}

#[test]
fn test_filter_integration_or_operator() {
    let records = timeline();
    let filter = parse_filter("kind:new OR kind:delete").expect("Parse filter");
    assert_eq!(ids(apply_filters(&records, &filter)), vec!["0xC3", "0xD4"]);
}

#[test]
fn test_filter_integration_invalid_filter() {
    let result = parse_filter("invalid:field");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Unknown field"));
}

#[test]
fn test_filter_integration_unknown_kind() {
    assert!(parse_filter("kind:vote").is_err());
}

#[test]
fn test_filter_integration_empty_result() {
    let records = timeline();
    let filter = parse_filter("id:0xff").expect("Parse filter");
    assert!(apply_filters(&records, &filter).is_empty());
}

#[test]
fn test_filter_integration_case_insensitive_id() {
    let records = timeline();
    let filter = parse_filter("id:0xc").expect("Parse filter");
    assert_eq!(ids(apply_filters(&records, &filter)), vec!["0xC3"]);
}

#[test]
fn test_filter_integration_quoted_value() {
    let records = timeline();
    let filter = parse_filter("id:\"0xA1\"").expect("Parse filter");
    assert_eq!(ids(apply_filters(&records, &filter)), vec!["0xA1"]);
}

#[test]
fn test_filter_integration_preserves_order() {
    let records = timeline();
    let filter = parse_filter("since:2021-01-01").expect("Parse filter");
    let filtered = apply_filters(&records, &filter);
    assert_eq!(filtered.len(), records.len());
    assert!(filtered.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
}
