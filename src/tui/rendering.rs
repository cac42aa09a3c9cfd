use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{END_OF_TIMELINE, InputField, MessageType, Modal, ModalBody, StatusMessage};
use super::layout::{AppLayout, centered_rect};
use super::timestamps::{format_full, format_timestamp};
use crate::diff::{DiffLine, LineStyle};
use crate::models::{EventKind, EventRecord};
use crate::utils::{single_line, strip_ansi_codes};

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const BAR_BG: Color = Color::Rgb(24, 24, 27);
const RED: Color = Color::Rgb(239, 68, 68);
const AMBER: Color = Color::Rgb(245, 158, 11);
const BLUE: Color = Color::Rgb(59, 130, 246);

/// Everything the renderer needs, borrowed from the app
pub struct RenderState<'a> {
    pub namespace_input: &'a str,
    pub date_input: &'a str,
    pub filter_input: &'a str,
    pub focus: InputField,
    pub records: Vec<&'a EventRecord>,
    pub total_count: usize,
    pub selected_idx: usize,
    pub space: &'a str,
    pub loading: bool,
    pub exhausted: bool,
    pub load_error: Option<&'a str>,
    pub filter_error: Option<&'a str>,
    pub status_message: Option<&'a StatusMessage>,
    pub modal: Option<&'a Modal>,
}

pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_input(frame, layout.namespace_area, " Space ", state.namespace_input, state.focus == InputField::Namespace);
    render_input(frame, layout.date_area, " Before ", state.date_input, state.focus == InputField::Date);
    render_input(frame, layout.filter_area, " Filter ", state.filter_input, state.focus == InputField::Filter);
    render_timeline(frame, layout.timeline_area, state);
    render_detail(frame, layout.detail_area, state.records.get(state.selected_idx).copied(), state.space);
    render_status_bar(frame, layout.status_area, state);

    if let Some(modal) = state.modal {
        render_modal(frame, modal);
    }
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused { ACCENT } else { MUTED };
    let text = if focused { format!("{}▏", value) } else { value.to_string() };

    let paragraph = Paragraph::new(text).block(
        Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)).title(title),
    );
    frame.render_widget(paragraph, area);
}

fn kind_style(kind: EventKind) -> (&'static str, Color) {
    match kind {
        EventKind::Proposal => ("🗳", BLUE),
        EventKind::Settings => ("⚙", AMBER),
        EventKind::DeleteProposal => ("🗑", RED),
        EventKind::UpdateProposal => ("✎", ACCENT),
    }
}

fn render_timeline(frame: &mut Frame, area: Rect, state: &RenderState) {
    let mut items: Vec<ListItem> = state
        .records
        .iter()
        .map(|record| {
            let (icon, color) = kind_style(record.kind);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {:<17}", icon, record.kind.label()), Style::default().fg(color)),
                Span::styled(format!("{:>12}  ", format_timestamp(&record.datetime())), Style::default().fg(MUTED)),
                Span::raw(single_line(&record.id)),
            ]))
        })
        .collect();

    if state.loading {
        items.push(ListItem::new(Span::styled("Loading…", Style::default().fg(MUTED))));
    } else if state.exhausted && state.total_count > 0 {
        items.push(ListItem::new(Span::styled(END_OF_TIMELINE, Style::default().fg(MUTED))));
    }

    let title = if state.space.is_empty() {
        " Timeline ".to_string()
    } else {
        format!(" Timeline: {} ", single_line(state.space))
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)).title(title))
        .highlight_style(Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD));

    let mut list_state = ListState::default();
    if !state.records.is_empty() {
        list_state.select(Some(state.selected_idx.min(state.records.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail(frame: &mut Frame, area: Rect, record: Option<&EventRecord>, space: &str) {
    let label = |name: &str| Span::styled(format!("{:<11}", name), Style::default().fg(MUTED));

    let content = match record {
        Some(record) => {
            let mut lines = vec![
                Line::from(vec![label("Kind:"), Span::raw(record.kind.label())]),
                Line::from(vec![label("Time:"), Span::raw(format_full(&record.datetime()))]),
                Line::from(vec![label("ID:"), Span::raw(single_line(&record.id))]),
                Line::from(vec![label("MCI:"), Span::raw(record.sequence_index.to_string())]),
                Line::from(vec![label("IPFS:"), Span::raw(single_line(&record.content_ref))]),
                Line::from(""),
                Line::from(Span::styled("Ctrl+O content  Ctrl+Y copy ref  Ctrl+U copy link", Style::default().fg(MUTED))),
            ];
            if record.kind.has_diff() {
                lines.push(Line::from(Span::styled("Ctrl+D compare with previous", Style::default().fg(MUTED))));
            }
            if record.kind == EventKind::Proposal {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    crate::api::proposal_url(space, &single_line(&record.id)),
                    Style::default().fg(BLUE),
                )));
            }
            Text::from(lines)
        }
        None => Text::from("No event selected"),
    };

    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)).title(" Details "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub(super) fn status_line(state: &RenderState) -> (String, Style) {
    let normal = Style::default().fg(BRIGHT).bg(BAR_BG);
    let error = Style::default().fg(RED).bg(BAR_BG);

    if let Some(msg) = state.status_message {
        let style = match msg.message_type {
            MessageType::Success => Style::default().fg(ACCENT).bg(BAR_BG),
            MessageType::Error => error,
        };
        return (format!(" {} ", msg.text), style);
    }
    if let Some(err) = state.load_error {
        return (format!(" [ERROR] {} | Enter/Ctrl+R: retry | Esc: dismiss ", single_line(err)), error);
    }
    if let Some(err) = state.filter_error {
        return (format!(" [FILTER] {} ", single_line(err)), error);
    }
    if state.space.is_empty() {
        return (" Type a space and press Enter | Tab: next field | Ctrl+C: quit ".to_string(), normal);
    }
    if state.exhausted && state.total_count == 0 {
        return (format!(" No events found for {} | Ctrl+C: quit ", single_line(state.space)), normal);
    }

    let mut parts = Vec::new();
    if state.records.len() < state.total_count {
        parts.push(format!("{}/{} shown", state.records.len(), state.total_count));
    } else {
        parts.push(format!("{} events", state.total_count));
    }
    if !state.records.is_empty() {
        parts.push(format!("event {}/{}", state.selected_idx + 1, state.records.len()));
    }
    if state.loading {
        parts.push("loading…".to_string());
    } else if state.exhausted {
        parts.push(END_OF_TIMELINE.to_string());
    }
    parts.push("Enter: apply".to_string());
    parts.push("Ctrl+C: quit".to_string());

    (format!(" {} ", parts.join(" | ")), normal)
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (text, style) = status_line(state);
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn diff_line_style(style: LineStyle) -> Style {
    match style {
        LineStyle::Section => Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD),
        LineStyle::Added => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        LineStyle::Removed => Style::default().fg(RED).add_modifier(Modifier::BOLD),
        LineStyle::Modified => Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
        LineStyle::Label => Style::default().fg(MUTED),
        LineStyle::Value => Style::default(),
        LineStyle::Empty => Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
    }
}

fn to_line(line: &DiffLine) -> Line<'static> {
    Line::from(Span::styled(
        format!("{}{}", "  ".repeat(line.depth), strip_ansi_codes(&line.text)),
        diff_line_style(line.style),
    ))
}

fn render_modal(frame: &mut Frame, modal: &Modal) {
    let area = centered_rect(80, 80, frame.area());

    let (lines, border) = match &modal.body {
        ModalBody::Loading => (vec![Line::from(Span::styled("Loading…", Style::default().fg(MUTED)))], MUTED),
        ModalBody::Ready(view) => (view.lines().iter().map(to_line).collect(), ACCENT),
        ModalBody::Failed(err) => (
            vec![
                Line::from(Span::styled("Error", Style::default().fg(RED).add_modifier(Modifier::BOLD))),
                Line::from(strip_ansi_codes(err)),
            ],
            RED,
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", single_line(&modal.title)))
        .title_bottom(" ↑↓ scroll | Ctrl+Y copy | Esc close ");

    let paragraph = Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: false }).scroll((modal.scroll, 0));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
