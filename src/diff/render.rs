use serde_json::Value;

use super::delta::{Change, Delta};

pub const NO_CHANGES: &str = "No Changes Detected";

/// How a rendered line should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Section,
    Added,
    Removed,
    Modified,
    Label,
    Value,
    Empty,
}

/// One rendered line of a delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub depth: usize,
    pub style: LineStyle,
    pub text: String,
}

impl DiffLine {
    pub fn new(depth: usize, style: LineStyle, text: impl Into<String>) -> Self {
        Self { depth, style, text: text.into() }
    }
}

/// Render a delta into lines, depth-first, with dotted path labels
pub fn render_delta(delta: &Delta) -> Vec<DiffLine> {
    if delta.is_empty() {
        return vec![DiffLine::new(0, LineStyle::Empty, NO_CHANGES)];
    }

    let mut lines = Vec::new();
    render_into(delta, "", 0, &mut lines);
    lines
}

/// Plain text form, two spaces per depth level
pub fn render_plain(lines: &[DiffLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}{}", "  ".repeat(line.depth), line.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_into(delta: &Delta, prefix: &str, depth: usize, lines: &mut Vec<DiffLine>) {
    for (key, change) in delta.entries() {
        let path = if prefix.is_empty() { key.to_string() } else { format!("{}.{}", prefix, key) };

        match change {
            Change::Nested(inner) => {
                lines.push(DiffLine::new(depth, LineStyle::Section, format!("📁 {}", path)));
                render_into(inner, &path, depth + 1, lines);
            }
            Change::Added(after) => {
                lines.push(DiffLine::new(depth, LineStyle::Added, format!("+ {} (Added)", path)));
                push_value(after, depth + 1, lines);
            }
            Change::Removed(before) => {
                lines.push(DiffLine::new(depth, LineStyle::Removed, format!("- {} (Removed)", path)));
                push_value(before, depth + 1, lines);
            }
            Change::Modified { before, after } => {
                lines.push(DiffLine::new(depth, LineStyle::Modified, format!("~ {} (Modified)", path)));
                // "1" -> 1 would read the same on both sides unless strings are quoted
                let quoted = std::mem::discriminant(before) != std::mem::discriminant(after);
                let (before_text, after_text) = if quoted {
                    (format_json(before), format_json(after))
                } else {
                    (format_value(before), format_value(after))
                };
                lines.push(DiffLine::new(depth + 1, LineStyle::Label, "Before:"));
                push_text(&before_text, depth + 2, lines);
                lines.push(DiffLine::new(depth + 1, LineStyle::Label, "After:"));
                push_text(&after_text, depth + 2, lines);
            }
        }
    }
}

fn push_value(value: &Value, depth: usize, lines: &mut Vec<DiffLine>) {
    push_text(&format_value(value), depth, lines);
}

fn push_text(text: &str, depth: usize, lines: &mut Vec<DiffLine>) {
    for line in text.lines() {
        lines.push(DiffLine::new(depth, LineStyle::Value, line));
    }
}

/// Strings print raw, everything else as pretty JSON.
///
/// The empty string prints as `""` so it always yields a visible line.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        other => format_json(other),
    }
}

fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
