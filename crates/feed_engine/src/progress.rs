use feed_core::TerminalReason;

/// Progress notifications emitted while a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    SessionStarted { max_pages: u32 },
    NoResults,
    PageScraped {
        page: u32,
        records: usize,
        total: usize,
    },
    PageAdvanced { page: u32 },
    Finished {
        reason: TerminalReason,
        total: usize,
    },
}

pub trait ProgressSink {
    fn emit(&self, event: ScrapeEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: ScrapeEvent) {}
}
