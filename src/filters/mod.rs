//! Client-side filtering of the accumulated timeline.
//!
//! Filtering never feeds back into pagination: the pager keeps fetching
//! unfiltered pages and the view narrows what it shows.

pub mod apply;
pub mod ast;
pub mod parser;

pub use apply::{apply_filters, matches_filter};
pub use ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
pub use parser::parse_filter;
