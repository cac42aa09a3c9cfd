use super::ast::{FieldFilter, FilterExpr, FilterOperator};
use crate::models::EventRecord;

/// Records matching `filter`, in their original order
pub fn apply_filters<'a>(records: &'a [EventRecord], filter: &FilterExpr) -> Vec<&'a EventRecord> {
    records.iter().filter(|record| matches_filter(record, filter)).collect()
}

/// Evaluate the expression left to right; an empty expression matches everything
pub fn matches_filter(record: &EventRecord, filter: &FilterExpr) -> bool {
    let Some((first, rest)) = filter.filters.split_first() else {
        return true;
    };

    filter.operators.iter().zip(rest).fold(matches_field(record, first), |acc, (op, next)| match op {
        FilterOperator::And => acc && matches_field(record, next),
        FilterOperator::Or => acc || matches_field(record, next),
    })
}

fn matches_field(record: &EventRecord, filter: &FieldFilter) -> bool {
    match filter {
        FieldFilter::Kind(kind) => record.kind == *kind,
        FieldFilter::Id(needle) => record.id.to_lowercase().contains(needle.as_str()),
        FieldFilter::Since(cutoff) => record.timestamp >= *cutoff,
    }
}
