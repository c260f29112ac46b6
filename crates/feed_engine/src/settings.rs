use std::time::Duration;

use feed_core::DEFAULT_MAX_PAGES;

use crate::{PaginationController, ScrollLoader, SettlePolicy};

/// CSS selectors for the parts of the results page the scraper reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSelectors {
    /// Sentinel rendered only when the search matched nothing.
    pub no_results: String,
    /// Element the scroll gestures start from.
    pub scroll_anchor: String,
    /// One node per listing.
    pub listing: String,
    pub title: String,
    pub link: String,
    /// Caption line carrying the location.
    pub location: String,
    /// Primary description line carrying the employer.
    pub employer: String,
}

impl Default for FeedSelectors {
    fn default() -> Self {
        Self {
            no_results: ".jobs-search-no-results-banner".to_string(),
            scroll_anchor: ".jobs-search-results-list".to_string(),
            listing: ".job-card-container".to_string(),
            title: ".job-card-list__title".to_string(),
            link: "a.job-card-container__link".to_string(),
            location: ".job-card-container__metadata-item".to_string(),
            employer: ".job-card-container__primary-description".to_string(),
        }
    }
}

/// How listing fields are correlated into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Read every field inside its own listing node.
    #[default]
    PerListing,
    /// Read each field category page-wide and pair them by position.
    ParallelLists,
}

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub max_pages: u32,
    pub selectors: FeedSelectors,
    pub extraction_mode: ExtractionMode,
    /// Keep query strings on extracted links instead of stripping them.
    pub keep_query: bool,
    pub scroll: ScrollLoader,
    pub pagination: PaginationController,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            selectors: FeedSelectors::default(),
            extraction_mode: ExtractionMode::default(),
            keep_query: false,
            scroll: ScrollLoader::default(),
            pagination: PaginationController::default(),
        }
    }
}

impl ScrapeSettings {
    /// Replaces both settle policies with a poll on the listing count.
    pub fn poll_until_stable(mut self, interval: Duration, max_attempts: u32) -> Self {
        let policy = SettlePolicy::UntilStable {
            selector: self.selectors.listing.clone(),
            interval,
            max_attempts,
        };
        self.scroll.settle = policy.clone();
        self.pagination.settle = policy;
        self
    }
}
