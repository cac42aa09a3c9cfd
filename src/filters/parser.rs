//! Parser for the timeline filter language.
//!
//! # Syntax
//!
//! ```text
//! filter_expr  := field_filter (operator field_filter)*
//! field_filter := field:value | field:"quoted value"
//! operator     := AND | OR (case-insensitive)
//! field        := kind | id | since (case-insensitive)
//! ```
//!
//! # Fields
//!
//! - `kind:proposal|settings|delete|update` (wire names such as
//!   `update-proposal` work too)
//! - `id:text` - case-insensitive substring of the record id
//! - `since:YYYY-MM-DD` - records on or after that UTC day
//!
//! # Examples
//!
//! ```rust
//! # use snapshot_timeline::filters::parser::parse_filter;
//! // Settings changes and proposal updates only
//! let expr = parse_filter("kind:settings kind:update").unwrap();
//!
//! // Updates since the start of the year
//! let expr = parse_filter("kind:update since:2024-01-01").unwrap();
//!
//! // Explicit operator
//! let expr = parse_filter("id:0xab OR kind:delete").unwrap();
//! ```

use std::iter::Peekable;
use std::str::Chars;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;

use super::ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
use crate::models::EventKind;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field { name: String, value: String },
    Operator(FilterOperator),
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let word = read_until_whitespace(&mut chars);
        if word.eq_ignore_ascii_case("and") {
            tokens.push(Token::Operator(FilterOperator::And));
            continue;
        }
        if word.eq_ignore_ascii_case("or") {
            tokens.push(Token::Operator(FilterOperator::Or));
            continue;
        }

        let Some((name, rest)) = word.split_once(':') else {
            bail!("Invalid token: '{}' (expected field:value or AND/OR)", word);
        };

        let value = match rest.strip_prefix('"') {
            Some(opened) => read_quoted(&mut chars, opened)?,
            None => rest.to_string(),
        };

        if name.is_empty() || value.is_empty() {
            bail!("Invalid field:value format: {}", word);
        }

        tokens.push(Token::Field { name: name.to_string(), value });
    }

    Ok(tokens)
}

fn read_until_whitespace(chars: &mut Peekable<Chars>) -> String {
    let mut word = String::new();
    while let Some(ch) = chars.next_if(|c| !c.is_whitespace()) {
        word.push(ch);
    }
    word
}

/// Finish a quoted value whose opening quote was already consumed
fn read_quoted(chars: &mut Peekable<Chars>, opened: &str) -> Result<String> {
    if let Some((value, _)) = opened.split_once('"') {
        return Ok(value.to_string());
    }

    let mut value = opened.to_string();
    for ch in chars.by_ref() {
        if ch == '"' {
            return Ok(value);
        }
        value.push(ch);
    }

    Err(anyhow!("Unterminated quoted string"))
}

fn parse_field(name: &str) -> Result<FilterField> {
    match name.to_lowercase().as_str() {
        "kind" | "type" => Ok(FilterField::Kind),
        "id" => Ok(FilterField::Id),
        "since" => Ok(FilterField::Since),
        _ => Err(anyhow!("Unknown field: '{}' (valid fields: kind, id, since)", name)),
    }
}

fn parse_value(field: FilterField, value: &str) -> Result<FieldFilter> {
    match field {
        FilterField::Kind => value
            .parse::<EventKind>()
            .map(FieldFilter::Kind)
            .map_err(|_| anyhow!("Invalid kind value: '{}' (must be proposal, settings, delete or update)", value)),
        FilterField::Id => Ok(FieldFilter::Id(value.to_lowercase())),
        FilterField::Since => {
            // strict YYYY-MM-DD; chrono rejects dates like 2024-02-31
            let midnight = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .filter(|_| value.len() == 10)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .ok_or_else(|| anyhow!("Invalid date format: '{}' (expected YYYY-MM-DD)", value))?;
            Ok(FieldFilter::Since(midnight.and_utc().timestamp()))
        }
    }
}

/// Parse a filter expression; blank input yields an empty expression
pub fn parse_filter(input: &str) -> Result<FilterExpr> {
    let tokens = tokenize(input).context("Failed to tokenize filter")?;

    let mut expr = FilterExpr::new();
    let mut pending: Option<FilterOperator> = None;

    for token in tokens {
        match token {
            Token::Operator(op) => {
                if expr.is_empty() || pending.is_some() {
                    bail!("Unexpected {:?} operator (expected field:value)", op);
                }
                pending = Some(op);
            }
            Token::Field { name, value } => {
                let filter = parse_value(parse_field(&name)?, &value)?;
                let implicit = match expr.filters.last() {
                    Some(prev) if prev.field() == filter.field() => FilterOperator::Or,
                    _ => FilterOperator::And,
                };
                expr.push(pending.take().unwrap_or(implicit), filter);
            }
        }
    }

    if pending.is_some() {
        bail!("Filter ended with operator (expected field:value)");
    }

    Ok(expr)
}
