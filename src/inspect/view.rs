use serde_json::Value;

use crate::diff::{Delta, DiffLine, LineStyle, format_value, render_delta};
use crate::models::EventRecord;

/// Which drill-down the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrilldownKind {
    Content,
    Diff,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsComparison {
    pub current: Value,
    /// The previous settings update and its decoded settings, if one exists
    pub previous: Option<(EventRecord, Value)>,
    pub delta: Option<Delta>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProposalComparison {
    pub proposal_id: String,
    pub original: Value,
    pub updated: Value,
    pub delta: Delta,
}

/// A resolved drill-down, ready to display
#[derive(Debug, Clone, PartialEq)]
pub enum DrilldownView {
    Content { content_ref: String, url: String, document: Value },
    Settings(SettingsComparison),
    Proposal(ProposalComparison),
}

pub const NO_PREVIOUS_SETTINGS: &str = "No Previous Settings Found";

impl DrilldownView {
    pub fn title(&self) -> String {
        match self {
            Self::Content { content_ref, .. } => format!("Content {}", content_ref),
            Self::Settings(_) => "Settings Comparison".to_string(),
            Self::Proposal(cmp) => format!("Proposal Comparison {}", short_id(&cmp.proposal_id)),
        }
    }

    /// Styled lines for the modal and the CLI
    pub fn lines(&self) -> Vec<DiffLine> {
        match self {
            Self::Content { url, document, .. } => {
                let mut lines = vec![DiffLine::new(0, LineStyle::Label, url.clone())];
                push_json(document, &mut lines);
                lines
            }
            Self::Settings(cmp) => match &cmp.delta {
                Some(delta) => {
                    let mut lines = Vec::new();
                    if let Some((record, _)) = &cmp.previous {
                        lines.push(DiffLine::new(
                            0,
                            LineStyle::Label,
                            format!("Compared with settings update {}", short_id(&record.id)),
                        ));
                    }
                    lines.extend(render_delta(delta));
                    lines
                }
                None => {
                    let mut lines = vec![
                        DiffLine::new(0, LineStyle::Empty, NO_PREVIOUS_SETTINGS),
                        DiffLine::new(
                            0,
                            LineStyle::Label,
                            "This appears to be the first settings update for this space.",
                        ),
                        DiffLine::new(0, LineStyle::Section, "Current settings:"),
                    ];
                    push_json(&cmp.current, &mut lines);
                    lines
                }
            },
            Self::Proposal(cmp) => {
                let mut lines = vec![DiffLine::new(
                    0,
                    LineStyle::Label,
                    format!("Proposal {}", cmp.proposal_id),
                )];
                lines.extend(render_delta(&cmp.delta));
                lines
            }
        }
    }

    /// Text placed on the clipboard: the document, or the delta in tuple encoding
    pub fn clipboard_text(&self) -> String {
        let value = match self {
            Self::Content { document, .. } => document.clone(),
            Self::Settings(cmp) => match &cmp.delta {
                Some(delta) => delta.to_json(),
                None => cmp.current.clone(),
            },
            Self::Proposal(cmp) => cmp.delta.to_json(),
        };
        format_value(&value)
    }
}

fn push_json(value: &Value, lines: &mut Vec<DiffLine>) {
    for text in format_value(value).lines() {
        lines.push(DiffLine::new(0, LineStyle::Value, text));
    }
}

/// First and last eight characters of a long identifier
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 20 {
        return id.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}
