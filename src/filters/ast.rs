use crate::models::EventKind;

/// Fields a filter can test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Event kind (`proposal`, `settings`, `delete`, `update`)
    Kind,
    /// Substring of the record id
    Id,
    /// Records on or after a UTC day
    Since,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    And,
    Or,
}

/// A single `field:value` test, with its value already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    Kind(EventKind),
    /// Lowercased needle
    Id(String),
    /// Epoch seconds of midnight UTC
    Since(i64),
}

impl FieldFilter {
    pub fn field(&self) -> FilterField {
        match self {
            FieldFilter::Kind(_) => FilterField::Kind,
            FieldFilter::Id(_) => FilterField::Id,
            FieldFilter::Since(_) => FilterField::Since,
        }
    }
}

/// Flat list of filters joined by operators, evaluated left to right.
///
/// There are no parentheses. Without an explicit keyword, repeating a field
/// joins with OR (`kind:settings kind:update`) and switching fields joins with
/// AND (`kind:update id:0xab`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterExpr {
    pub filters: Vec<FieldFilter>,
    /// Always `filters.len() - 1` entries
    pub operators: Vec<FilterOperator>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter, joined to the previous one by `operator`
    pub fn push(&mut self, operator: FilterOperator, filter: FieldFilter) {
        if !self.filters.is_empty() {
            self.operators.push(operator);
        }
        self.filters.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_inserts_operator_between_filters() {
        let mut expr = FilterExpr::new();
        assert!(expr.is_empty());

        expr.push(FilterOperator::And, FieldFilter::Kind(EventKind::Settings));
        assert!(expr.operators.is_empty());

        expr.push(FilterOperator::Or, FieldFilter::Id("0xab".to_string()));
        assert_eq!(expr.filters.len(), 2);
        assert_eq!(expr.operators, vec![FilterOperator::Or]);
        assert_eq!(expr.filters[1].field(), FilterField::Id);
    }
}
