use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::api::{MessageQuery, MessageSource};
use crate::error::{Result, TimelineError};
use crate::models::EventRecord;

/// Pagination position within the current query context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Timestamp of the last record received; `None` before the first page
    pub last_seen_timestamp: Option<i64>,
    /// Set once a page came back shorter than requested
    pub exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    Idle,
    Loading { generation: u64, page_size: usize },
    Exhausted,
}

/// A page fetch handed out by [`TimelineController::begin_load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub page_size: usize,
    pub query: MessageQuery,
}

/// Result of feeding a fetch response back into the controller
#[derive(Debug)]
pub enum PageOutcome {
    /// Records appended to the list, in order
    Loaded { records: Vec<EventRecord>, exhausted: bool },
    /// Response belonged to an earlier query context (or nothing was in flight)
    Stale,
    /// Fetch failed; cursor and list are unchanged
    Failed(TimelineError),
}

/// Cursor-driven pager for one namespace's timeline.
#[derive(Debug)]
pub struct TimelineController {
    space: String,
    date_cutoff: Option<i64>,
    records: Vec<EventRecord>,
    seen_ids: HashSet<String>,
    last_seen_timestamp: Option<i64>,
    state: PagerState,
    generation: u64,
}

impl TimelineController {
    pub fn new(space: impl Into<String>, date_cutoff: Option<i64>) -> Self {
        Self {
            space: space.into(),
            date_cutoff,
            records: Vec::new(),
            seen_ids: HashSet::new(),
            last_seen_timestamp: None,
            state: PagerState::Idle,
            generation: 0,
        }
    }

    /// Start over for a new query context.
    ///
    /// Clears the list and cursor and invalidates any request still in flight.
    pub fn reset(&mut self, space: impl Into<String>, date_cutoff: Option<i64>) {
        self.space = space.into();
        self.date_cutoff = date_cutoff;
        self.records.clear();
        self.seen_ids.clear();
        self.last_seen_timestamp = None;
        self.state = PagerState::Idle;
        self.generation += 1;
        info!(
            space = %self.space,
            date_cutoff = ?self.date_cutoff,
            generation = self.generation,
            "timeline reset"
        );
    }

    /// Claim the single in-flight slot and build the next page query.
    ///
    /// Returns `None` while a request is outstanding, once exhausted, or when no
    /// namespace is set. A page size of zero is treated as one.
    pub fn begin_load(&mut self, page_size: usize) -> Option<PageRequest> {
        if self.state != PagerState::Idle {
            return None;
        }
        if self.space.trim().is_empty() {
            warn!("load requested without a namespace");
            return None;
        }

        let page_size = page_size.max(1);
        let upper_bound = self.last_seen_timestamp.or(self.date_cutoff);
        self.state = PagerState::Loading { generation: self.generation, page_size };

        debug!(
            space = %self.space,
            page_size,
            timestamp_lt = ?upper_bound,
            generation = self.generation,
            "requesting page"
        );

        Some(PageRequest {
            generation: self.generation,
            page_size,
            query: MessageQuery::page(self.space.clone(), page_size, upper_bound),
        })
    }

    /// Apply the response for a request obtained from [`Self::begin_load`].
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<EventRecord>>,
    ) -> PageOutcome {
        let page_size = match self.state {
            PagerState::Loading { generation: pending, page_size } if pending == generation => {
                page_size
            }
            _ => {
                debug!(generation, current = self.generation, "discarding stale page response");
                return PageOutcome::Stale;
            }
        };

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.state = PagerState::Idle;
                warn!(error = %e, space = %self.space, "page fetch failed");
                return PageOutcome::Failed(e);
            }
        };

        let fetched = page.len();
        if let Some(last) = page.last() {
            self.last_seen_timestamp = Some(last.timestamp);
        }

        let mut appended = Vec::with_capacity(fetched);
        for record in page {
            if self.seen_ids.insert(record.id.clone()) {
                appended.push(record);
            } else {
                warn!(id = %record.id, "dropping duplicate record");
            }
        }
        self.records.extend(appended.iter().cloned());

        // Exhaustion is judged on the raw page, never on what survives filtering
        let exhausted = fetched < page_size;
        self.state = if exhausted { PagerState::Exhausted } else { PagerState::Idle };

        debug!(
            fetched,
            total = self.records.len(),
            exhausted,
            last_seen = ?self.last_seen_timestamp,
            "page loaded"
        );

        PageOutcome::Loaded { records: appended, exhausted }
    }

    /// Fetch the next page from `source` and append it.
    ///
    /// Returns the newly appended records; an empty list when exhausted or
    /// already loading, in which case no fetch is issued.
    pub async fn load_next(
        &mut self,
        source: &dyn MessageSource,
        page_size: usize,
    ) -> Result<Vec<EventRecord>> {
        let Some(request) = self.begin_load(page_size) else {
            return Ok(Vec::new());
        };

        let result = source.fetch_messages(&request.query).await;
        match self.complete(request.generation, result) {
            PageOutcome::Loaded { records, .. } => Ok(records),
            PageOutcome::Stale => Ok(Vec::new()),
            PageOutcome::Failed(e) => Err(e),
        }
    }

    pub fn space(&self) -> &str {
        &self.space
    }

    pub fn date_cutoff(&self) -> Option<i64> {
        self.date_cutoff
    }

    /// Every record loaded since the last reset, newest first
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn cursor(&self) -> Cursor {
        Cursor {
            last_seen_timestamp: self.last_seen_timestamp,
            exhausted: self.is_exhausted(),
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PagerState::Loading { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == PagerState::Exhausted
    }
}
