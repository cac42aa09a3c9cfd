//! TUI application state and event handling.
//!
//! The [`App`] owns the [`TimelineController`] and runs a synchronous draw/poll
//! loop. Network work never blocks the loop: page fetches and drill-downs are
//! spawned on the tokio runtime and report back as [`FeedMessage`]s, which the
//! loop drains every tick.
//!
//! - **Inputs**: namespace, date cutoff and filter expression, cycled with Tab.
//!   Enter submits; a changed namespace or date resets the controller, a
//!   changed filter only re-filters what is already loaded.
//! - **Infinite scroll**: moving the selection within `scroll_threshold` rows
//!   of the end of the list asks the controller for the next page.
//! - **Modal**: content and diff drill-downs render in an overlay. Each modal
//!   has an id, so a late response for a closed modal is dropped.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::api::{ContentResolver, MessageSource, proposal_url};
use crate::clipboard::{ClipboardProvider, SystemClipboard, copy_with};
use crate::filters::{FilterExpr, matches_filter, parse_filter};
use crate::inspect::{DrilldownKind, DrilldownView, open_drilldown};
use crate::models::{EventKind, EventRecord};
use crate::pager::{PageOutcome, TimelineController, parse_date_cutoff};

const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
const STATUS_ERROR_DURATION_MS: u64 = 5000;
const MAX_INPUT_LEN: usize = 256;
const PAGE_JUMP: isize = 10;

pub const END_OF_TIMELINE: &str = "You've reached the beginning of time!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Which input box receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Namespace,
    Date,
    Filter,
}

impl InputField {
    fn next(self) -> Self {
        match self {
            InputField::Namespace => InputField::Date,
            InputField::Date => InputField::Filter,
            InputField::Filter => InputField::Namespace,
        }
    }

    fn prev(self) -> Self {
        match self {
            InputField::Namespace => InputField::Filter,
            InputField::Date => InputField::Namespace,
            InputField::Filter => InputField::Date,
        }
    }
}

/// Results delivered from spawned network tasks
#[derive(Debug)]
pub enum FeedMessage {
    Page { generation: u64, result: crate::error::Result<Vec<EventRecord>> },
    Drilldown { modal_id: u64, result: crate::error::Result<DrilldownView> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalBody {
    Loading,
    Ready(DrilldownView),
    Failed(String),
}

/// Drill-down overlay
#[derive(Debug, Clone)]
pub struct Modal {
    pub id: u64,
    pub title: String,
    pub body: ModalBody,
    pub scroll: u16,
}

impl Modal {
    /// Last scroll offset that still shows a line of the body
    pub fn max_scroll(&self) -> u16 {
        let lines = match &self.body {
            ModalBody::Loading => 1,
            ModalBody::Ready(view) => view.lines().len(),
            ModalBody::Failed(_) => 2,
        };
        u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
    }
}

/// Network clients shared with spawned tasks
#[derive(Clone)]
pub struct Services {
    pub source: Arc<dyn MessageSource>,
    pub resolver: Arc<dyn ContentResolver>,
}

/// Knobs taken from the config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseSettings {
    pub page_size: usize,
    pub scroll_threshold: usize,
}

pub struct App {
    services: Services,
    runtime: Handle,
    settings: BrowseSettings,
    tx: UnboundedSender<FeedMessage>,
    rx: UnboundedReceiver<FeedMessage>,
    controller: TimelineController,
    // Inputs
    namespace_input: String,
    date_input: String,
    filter_input: String,
    focus: InputField,
    // View over the controller's records
    filter: FilterExpr,
    filter_error: Option<String>,
    visible: Vec<usize>,
    selected_idx: usize,
    load_error: Option<String>,
    modal: Option<Modal>,
    next_modal_id: u64,
    status_message: Option<StatusMessage>,
    clipboard: Box<dyn ClipboardProvider>,
    should_quit: bool,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(services: Services, runtime: Handle, settings: BrowseSettings, namespace: impl Into<String>) -> Self {
        let (tx, rx) = unbounded_channel();
        let namespace = namespace.into();

        Self {
            services,
            runtime,
            settings,
            tx,
            rx,
            controller: TimelineController::new(String::new(), None),
            namespace_input: namespace,
            date_input: String::new(),
            filter_input: String::new(),
            focus: InputField::Namespace,
            filter: FilterExpr::new(),
            filter_error: None,
            visible: Vec::new(),
            selected_idx: 0,
            load_error: None,
            modal: None,
            next_modal_id: 0,
            status_message: None,
            clipboard: Box::new(SystemClipboard),
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Replace the clipboard backend
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardProvider>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if !self.namespace_input.trim().is_empty() {
            self.submit();
        }

        while !self.should_quit {
            self.check_and_clear_expired_status();
            self.drain_messages();

            // Redraw when dirty, and periodically so resizes are picked up
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100) {
                terminal.draw(|f| render_ui(f, &self.render_state()))?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(50))?;
            self.handle_action(action);
        }

        Ok(())
    }

    fn render_state(&self) -> RenderState<'_> {
        RenderState {
            namespace_input: &self.namespace_input,
            date_input: &self.date_input,
            filter_input: &self.filter_input,
            focus: self.focus,
            records: self.visible_records(),
            total_count: self.controller.records().len(),
            selected_idx: self.selected_idx,
            space: self.controller.space(),
            loading: self.controller.is_loading(),
            exhausted: self.controller.is_exhausted(),
            load_error: self.load_error.as_deref(),
            filter_error: self.filter_error.as_deref(),
            status_message: self.status_message.as_ref(),
            modal: self.modal.as_ref(),
        }
    }

    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn check_and_clear_expired_status(&mut self) {
        if self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at) {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    pub(crate) fn handle_action(&mut self, action: Action) {
        if self.modal.is_some() {
            self.handle_modal_action(action);
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => {
                if self.load_error.take().is_some() {
                    self.needs_redraw = true;
                    return;
                }
                let input = self.focused_input_mut();
                if input.is_empty() {
                    self.should_quit = true;
                } else {
                    input.clear();
                    self.needs_redraw = true;
                }
            }
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-PAGE_JUMP),
            Action::PageDown => self.move_selection(PAGE_JUMP),
            Action::Submit => self.submit(),
            Action::NextField => {
                self.focus = self.focus.next();
                self.needs_redraw = true;
            }
            Action::PrevField => {
                self.focus = self.focus.prev();
                self.needs_redraw = true;
            }
            Action::OpenContent => self.open_modal(DrilldownKind::Content),
            Action::OpenDiff => self.open_modal(DrilldownKind::Diff),
            Action::Copy => {
                let content_ref = self.selected_record().map(|r| r.content_ref.clone());
                match content_ref {
                    Some(content_ref) => self.copy(&content_ref, "Content reference"),
                    None => self.set_status("✗ No event selected", MessageType::Error, STATUS_ERROR_DURATION_MS),
                }
            }
            Action::CopyLink => self.copy_link(),
            Action::Refresh => self.refresh(),
            Action::Input(c) => {
                let input = self.focused_input_mut();
                if input.len() < MAX_INPUT_LEN {
                    input.push(c);
                    self.needs_redraw = true;
                }
            }
            Action::DeleteChar => {
                if self.focused_input_mut().pop().is_some() {
                    self.needs_redraw = true;
                }
            }
            Action::None => {}
        }
    }

    fn handle_modal_action(&mut self, action: Action) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };

        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => {
                debug!(modal_id = modal.id, "modal closed");
                self.modal = None;
            }
            Action::MoveUp => modal.scroll = modal.scroll.saturating_sub(1),
            Action::MoveDown => modal.scroll = modal.scroll.saturating_add(1).min(modal.max_scroll()),
            Action::PageUp => modal.scroll = modal.scroll.saturating_sub(PAGE_JUMP as u16),
            Action::PageDown => modal.scroll = modal.scroll.saturating_add(PAGE_JUMP as u16).min(modal.max_scroll()),
            Action::Copy => {
                let text = match &modal.body {
                    ModalBody::Ready(view) => Some(view.clipboard_text()),
                    _ => None,
                };
                match text {
                    Some(text) => self.copy(&text, "Drill-down"),
                    None => self.set_status("✗ Nothing loaded yet", MessageType::Error, STATUS_ERROR_DURATION_MS),
                }
            }
            _ => return,
        }
        self.needs_redraw = true;
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            InputField::Namespace => &mut self.namespace_input,
            InputField::Date => &mut self.date_input,
            InputField::Filter => &mut self.filter_input,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.visible.len();
        if total == 0 {
            self.selected_idx = 0;
            return;
        }

        let old_idx = self.selected_idx;
        let new_idx = (self.selected_idx as isize + delta).max(0) as usize;
        self.selected_idx = new_idx.min(total - 1);

        if old_idx != self.selected_idx {
            self.needs_redraw = true;
        }
        self.maybe_load_more();
    }

    /// Apply the three inputs. Namespace or date changes restart the timeline.
    fn submit(&mut self) {
        let namespace = self.namespace_input.trim().to_string();

        let cutoff = match parse_date_cutoff(&self.date_input) {
            Ok(cutoff) => cutoff,
            Err(e) => {
                self.set_status(format!("✗ {}", e), MessageType::Error, STATUS_ERROR_DURATION_MS);
                return;
            }
        };

        match parse_filter(&self.filter_input) {
            Ok(expr) => {
                self.filter = expr;
                self.filter_error = None;
            }
            Err(e) => {
                self.filter_error = Some(format!("{:#} | Try: kind:settings kind:update since:2024-01-01", e));
            }
        }

        if namespace.is_empty() {
            self.set_status("✗ Enter a space, e.g. thanku.eth", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        }

        if namespace != self.controller.space() || cutoff != self.controller.date_cutoff() {
            self.restart(namespace, cutoff);
        } else {
            self.refilter();
            if !self.retry_failed_page() {
                self.maybe_load_more();
            }
        }
        self.needs_redraw = true;
    }

    /// Clear a page error and fetch again from the current cursor.
    /// Returns false when there was no error to retry.
    fn retry_failed_page(&mut self) -> bool {
        if self.load_error.take().is_none() {
            return false;
        }
        debug!(last_seen = ?self.controller.cursor().last_seen_timestamp, "retrying failed page");
        self.request_page();
        true
    }

    fn refresh(&mut self) {
        if self.retry_failed_page() {
            return;
        }
        let space = self.controller.space().to_string();
        if space.is_empty() {
            return;
        }
        let cutoff = self.controller.date_cutoff();
        self.restart(space, cutoff);
    }

    fn restart(&mut self, space: String, cutoff: Option<i64>) {
        info!(%space, ?cutoff, "loading timeline");
        self.controller.reset(space, cutoff);
        self.load_error = None;
        self.visible.clear();
        self.selected_idx = 0;
        self.request_page();
    }

    /// Ask for the next page when the selection is close to the end
    fn maybe_load_more(&mut self) {
        if self.controller.space().is_empty() || self.controller.is_exhausted() || self.controller.is_loading() {
            return;
        }
        if self.load_error.is_some() {
            return;
        }
        if self.selected_idx + self.settings.scroll_threshold >= self.visible.len() {
            self.request_page();
        }
    }

    fn request_page(&mut self) {
        let Some(request) = self.controller.begin_load(self.settings.page_size) else {
            return;
        };

        let source = Arc::clone(&self.services.source);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = source.fetch_messages(&request.query).await;
            let _ = tx.send(FeedMessage::Page { generation: request.generation, result });
        });
        self.needs_redraw = true;
    }

    /// Apply every pending network result; returns how many were handled
    pub(crate) fn drain_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    fn handle_message(&mut self, message: FeedMessage) {
        match message {
            FeedMessage::Page { generation, result } => match self.controller.complete(generation, result) {
                PageOutcome::Loaded { .. } => {
                    self.refilter();
                    self.maybe_load_more();
                }
                PageOutcome::Stale => {}
                PageOutcome::Failed(e) => {
                    warn!(error = %e, "page load failed");
                    self.load_error = Some(e.to_string());
                }
            },
            FeedMessage::Drilldown { modal_id, result } => {
                let Some(modal) = self.modal.as_mut().filter(|m| m.id == modal_id) else {
                    debug!(modal_id, "discarding drill-down for a closed modal");
                    return;
                };
                modal.body = match result {
                    Ok(view) => {
                        modal.title = view.title();
                        ModalBody::Ready(view)
                    }
                    Err(e) => {
                        warn!(error = %e, "drill-down failed");
                        ModalBody::Failed(e.to_string())
                    }
                };
            }
        }
        self.needs_redraw = true;
    }

    /// Recompute the visible rows, keeping the selected record if it survives
    fn refilter(&mut self) {
        let selected_id = self.selected_record().map(|r| r.id.clone());
        let records = self.controller.records();

        self.visible =
            (0..records.len()).filter(|&i| matches_filter(&records[i], &self.filter)).collect();

        self.selected_idx = selected_id
            .and_then(|id| self.visible.iter().position(|&i| records[i].id == id))
            .unwrap_or(0)
            .min(self.visible.len().saturating_sub(1));
    }

    fn visible_records(&self) -> Vec<&EventRecord> {
        let records = self.controller.records();
        self.visible.iter().map(|&i| &records[i]).collect()
    }

    fn selected_record(&self) -> Option<&EventRecord> {
        self.visible.get(self.selected_idx).map(|&i| &self.controller.records()[i])
    }

    fn open_modal(&mut self, kind: DrilldownKind) {
        let Some(record) = self.selected_record().cloned() else {
            self.set_status("✗ No event selected", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        };
        if kind == DrilldownKind::Diff && !record.kind.has_diff() {
            self.set_status(
                format!("✗ No diff for {} events", record.kind.label()),
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            );
            return;
        }

        self.next_modal_id += 1;
        let modal_id = self.next_modal_id;
        let title = match kind {
            DrilldownKind::Content => format!("Content {}", record.content_ref),
            DrilldownKind::Diff => format!("{} diff", record.kind.label()),
        };
        self.modal = Some(Modal { id: modal_id, title, body: ModalBody::Loading, scroll: 0 });

        let services = self.services.clone();
        let space = self.controller.space().to_string();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result =
                open_drilldown(kind, services.source.as_ref(), services.resolver.as_ref(), &space, &record).await;
            let _ = tx.send(FeedMessage::Drilldown { modal_id, result });
        });
        self.needs_redraw = true;
    }

    fn copy_link(&mut self) {
        let Some(record) = self.selected_record() else {
            self.set_status("✗ No event selected", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        };
        let link = match record.kind {
            EventKind::Proposal => proposal_url(self.controller.space(), &record.id),
            _ => self.services.resolver.content_url(&record.content_ref),
        };
        self.copy(&link, "Link");
    }

    fn copy(&mut self, text: &str, what: &str) {
        match copy_with(self.clipboard.as_mut(), text) {
            Ok(()) => self.set_status(format!("✓ {} copied", what), MessageType::Success, STATUS_SUCCESS_DURATION_MS),
            Err(e) => {
                self.set_status(format!("✗ Clipboard error: {}", e), MessageType::Error, STATUS_ERROR_DURATION_MS)
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn controller(&self) -> &TimelineController {
        &self.controller
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }
}
