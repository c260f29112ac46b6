use std::collections::VecDeque;

use feed_core::{update, AdvanceOutcome, Effect, FeedOutcome, FeedState, Msg, TerminalReason};
use feed_logging::{feed_error, feed_info, feed_warn};

use crate::detect::detect_no_results;
use crate::{
    PageExtractor, ProgressSink, RenderSurface, ScrapeEvent, ScrapeSettings, SurfaceError,
    SurfaceResult,
};

/// Runs one search session against a render surface.
///
/// The loop itself lives in [`feed_core::update`]; this type executes each
/// effect it asks for and feeds the result back as the next message. The
/// surface is borrowed for the whole run and nothing else touches it.
pub struct FeedScraper {
    settings: ScrapeSettings,
    extractor: PageExtractor,
}

impl FeedScraper {
    pub fn new(settings: ScrapeSettings) -> Self {
        let extractor = PageExtractor::new(settings.selectors.clone(), settings.extraction_mode)
            .with_keep_query(settings.keep_query);
        Self {
            settings,
            extractor,
        }
    }

    pub fn run(&self, surface: &dyn RenderSurface, sink: &dyn ProgressSink) -> FeedOutcome {
        let mut state = FeedState::with_max_pages(self.settings.max_pages);
        feed_logging::set_page_index(1);
        sink.emit(ScrapeEvent::SessionStarted {
            max_pages: state.max_pages(),
        });

        let mut inbox = VecDeque::from([Msg::Begin]);
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                if let Some(reply) = self.execute(&state, effect, surface, sink) {
                    inbox.push_back(reply);
                }
            }
        }

        if !state.is_terminal() {
            feed_error!("session stopped in {:?} without a terminal state", state.phase());
        }
        state.into_outcome_or_failed("session stalled")
    }

    fn execute(
        &self,
        state: &FeedState,
        effect: Effect,
        surface: &dyn RenderSurface,
        sink: &dyn ProgressSink,
    ) -> Option<Msg> {
        match effect {
            Effect::CheckNoResults => {
                let found = detect_no_results(surface, &self.settings.selectors.no_results);
                Some(match or_stale(found, false, "no-results check") {
                    Ok(empty) => {
                        if empty {
                            sink.emit(ScrapeEvent::NoResults);
                        }
                        Msg::NoResultsChecked { empty }
                    }
                    Err(msg) => msg,
                })
            }
            Effect::LoadMore => {
                feed_logging::set_page_index(state.current_page_index().saturating_sub(1));
                Some(match or_stale(self.load_more(surface), (), "scroll pass") {
                    Ok(()) => Msg::ContentLoaded,
                    Err(msg) => msg,
                })
            }
            Effect::ExtractPage => {
                let extracted = self.extractor.extract(surface);
                Some(match or_stale(extracted, Vec::new(), "page extraction") {
                    Ok(records) => {
                        let page = state.current_page_index().saturating_sub(1);
                        feed_info!("read {} listings", records.len());
                        sink.emit(ScrapeEvent::PageScraped {
                            page,
                            records: records.len(),
                            total: state.records().len() + records.len(),
                        });
                        Msg::PageExtracted(records)
                    }
                    Err(msg) => msg,
                })
            }
            Effect::AdvancePage { expected_index } => {
                let advanced = self.settings.pagination.advance_page(surface, expected_index);
                Some(match or_stale(advanced, AdvanceOutcome::Exhausted, "pagination") {
                    Ok(outcome) => {
                        if outcome == AdvanceOutcome::Advanced {
                            sink.emit(ScrapeEvent::PageAdvanced {
                                page: expected_index,
                            });
                        }
                        Msg::PageAdvanced(outcome)
                    }
                    Err(msg) => msg,
                })
            }
            Effect::Finished { reason } => {
                self.log_finish(state, reason);
                sink.emit(ScrapeEvent::Finished {
                    reason,
                    total: state.records().len(),
                });
                None
            }
        }
    }

    /// Scrolls from a freshly resolved anchor. A missing anchor only costs the
    /// lazy-loaded tail of the page, so extraction still runs.
    fn load_more(&self, surface: &dyn RenderSurface) -> SurfaceResult<()> {
        let selector = &self.settings.selectors.scroll_anchor;
        let Some(anchor) = surface.find_one(selector)? else {
            feed_warn!("scroll anchor {} not found, reading mounted listings only", selector);
            return Ok(());
        };
        self.settings.scroll.load_more(surface, anchor)
    }

    fn log_finish(&self, state: &FeedState, reason: TerminalReason) {
        match reason {
            TerminalReason::ReadFailure => feed_error!(
                "session aborted after {} pages, {} records kept: {}",
                state.pages_visited(),
                state.records().len(),
                state.failure().unwrap_or("unknown error")
            ),
            _ => feed_info!(
                "session finished ({}) after {} pages with {} records",
                reason,
                state.pages_visited(),
                state.records().len()
            ),
        }
    }
}

/// Stale nodes degrade to `fallback`; every other error ends the session.
fn or_stale<T>(result: SurfaceResult<T>, fallback: T, step: &str) -> Result<T, Msg> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if !err.is_fatal() => {
            feed_warn!("{} hit a stale node ({}), continuing", step, err);
            Ok(fallback)
        }
        Err(err) => Err(read_failed(err)),
    }
}

fn read_failed(err: SurfaceError) -> Msg {
    Msg::ReadFailed {
        message: err.to_string(),
    }
}
