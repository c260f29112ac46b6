use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ListingRecord, ResultAggregator};

/// Hard cap on extracted pages for one session.
pub const DEFAULT_MAX_PAGES: u32 = 4;

/// Page 1 is already rendered when a session starts, so the first page selector
/// control to look for is labelled 2.
pub const FIRST_PAGINATED_INDEX: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Start,
    Scanning,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalReason {
    Exhausted,
    NoResults,
    CapReached,
    ReadFailure,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalReason::Exhausted => write!(f, "pagination exhausted"),
            TerminalReason::NoResults => write!(f, "no results"),
            TerminalReason::CapReached => write!(f, "page cap reached"),
            TerminalReason::ReadFailure => write!(f, "read failure"),
        }
    }
}

/// Loop state for one search session. Only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    phase: Phase,
    current_page_index: u32,
    pages_visited: u32,
    max_pages: u32,
    aggregator: ResultAggregator,
    terminal_reason: Option<TerminalReason>,
    failure: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self::with_max_pages(DEFAULT_MAX_PAGES)
    }

    /// A cap of zero is treated as one: the first page is always read.
    pub fn with_max_pages(max_pages: u32) -> Self {
        Self {
            phase: Phase::Start,
            current_page_index: 1,
            pages_visited: 0,
            max_pages: max_pages.max(1),
            aggregator: ResultAggregator::new(),
            terminal_reason: None,
            failure: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_page_index(&self) -> u32 {
        self.current_page_index
    }

    pub fn pages_visited(&self) -> u32 {
        self.pages_visited
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn records(&self) -> &[ListingRecord] {
        self.aggregator.records()
    }

    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        self.terminal_reason
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Hands the aggregated records to the consumer. `None` until the session is done.
    pub fn into_outcome(self) -> Option<FeedOutcome> {
        let reason = self.terminal_reason?;
        Some(self.outcome(reason))
    }

    /// Like [`FeedState::into_outcome`], but a session that never reached a
    /// terminal state is closed as a read failure carrying `message`.
    pub fn into_outcome_or_failed(mut self, message: &str) -> FeedOutcome {
        match self.terminal_reason {
            Some(reason) => self.outcome(reason),
            None => {
                self.fail(message.to_string());
                self.outcome(TerminalReason::ReadFailure)
            }
        }
    }

    fn outcome(self, reason: TerminalReason) -> FeedOutcome {
        FeedOutcome {
            records: self.aggregator.into_records(),
            terminal_reason: reason,
            pages_visited: self.pages_visited,
            failure: self.failure,
        }
    }

    pub(crate) fn start_scanning(&mut self) {
        self.phase = Phase::Scanning;
        self.pages_visited = 0;
        self.current_page_index = FIRST_PAGINATED_INDEX;
    }

    pub(crate) fn record_page(&mut self, batch: Vec<ListingRecord>) {
        self.aggregator.extend(batch);
        self.pages_visited += 1;
    }

    pub(crate) fn cap_reached(&self) -> bool {
        self.pages_visited >= self.max_pages
    }

    pub(crate) fn advance_page_index(&mut self) {
        self.current_page_index += 1;
    }

    pub(crate) fn finish(&mut self, reason: TerminalReason) {
        self.phase = Phase::Done;
        self.terminal_reason = Some(reason);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.failure = Some(message);
        self.finish(TerminalReason::ReadFailure);
    }
}

/// Final, read-only result of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOutcome {
    pub records: Vec<ListingRecord>,
    pub terminal_reason: TerminalReason,
    pub pages_visited: u32,
    pub failure: Option<String>,
}
