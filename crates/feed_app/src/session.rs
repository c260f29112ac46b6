use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use feed_core::FeedOutcome;
use feed_engine::{
    ChromeSurface, FeedScraper, ProgressSink, RenderSurface, ScrapeEvent, ScrapeSettings,
    SnapshotSurface,
};
use feed_logging::{feed_info, feed_warn};
use headless_chrome::{Browser, LaunchOptionsBuilder};

use crate::config::BrowserConfig;
use crate::SessionError;

/// Where the first results page comes from.
pub enum SessionSource {
    /// Launch or attach to Chrome and open the search url.
    Browser { url: String, browser: BrowserConfig },
    /// Saved result pages, page 1 first.
    Replay {
        pages: Vec<PathBuf>,
        base_url: Option<String>,
    },
}

/// Logs progress events as they arrive.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::SessionStarted { max_pages } => {
                feed_info!("session started, reading up to {} pages", max_pages)
            }
            ScrapeEvent::NoResults => feed_warn!("search returned no results"),
            ScrapeEvent::PageScraped {
                page,
                records,
                total,
            } => feed_info!("page {}: {} listings ({} total)", page, records, total),
            ScrapeEvent::PageAdvanced { page } => feed_info!("moved to page {}", page),
            ScrapeEvent::Finished { reason, total } => {
                feed_info!("finished: {} with {} listings", reason, total)
            }
        }
    }
}

pub fn run(source: SessionSource, settings: ScrapeSettings) -> Result<FeedOutcome, SessionError> {
    let scraper = FeedScraper::new(settings);
    match source {
        SessionSource::Browser { url, browser } => run_in_browser(&scraper, &url, &browser),
        SessionSource::Replay { pages, base_url } => {
            let mut html = Vec::with_capacity(pages.len());
            for path in pages {
                let content = fs::read_to_string(&path)
                    .map_err(|source| SessionError::Snapshot { path, source })?;
                html.push(content);
            }
            let mut surface = SnapshotSurface::from_pages(html);
            if let Some(base_url) = base_url {
                surface = surface.with_base_url(base_url);
            }
            feed_info!("replaying {} saved pages", surface.page_count());
            Ok(scraper.run(&surface, &LogProgressSink))
        }
    }
}

fn run_in_browser(
    scraper: &FeedScraper,
    url: &str,
    config: &BrowserConfig,
) -> Result<FeedOutcome, SessionError> {
    let browser = match &config.connect {
        Some(ws_url) => {
            feed_info!("attaching to browser at {}", ws_url);
            Browser::connect(ws_url.clone()).map_err(browser_error)?
        }
        None => {
            let options = LaunchOptionsBuilder::default()
                .headless(config.headless)
                .window_size(Some((config.window_width, config.window_height)))
                .build()
                .map_err(browser_error)?;
            Browser::new(options).map_err(browser_error)?
        }
    };

    let tab = browser.new_tab().map_err(browser_error)?;
    feed_info!("opening {}", url);
    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(browser_error)?;

    let surface = ChromeSurface::new(tab);
    surface.wait(Duration::from_millis(config.initial_wait_ms));
    let outcome = scraper.run(&surface, &LogProgressSink);

    // The tab is ours even when attached to a running browser.
    if let Err(err) = surface.tab().close(true) {
        feed_warn!("failed to close the scraping tab: {}", err);
    }
    Ok(outcome)
}

fn browser_error(err: impl std::fmt::Display) -> SessionError {
    SessionError::Browser(err.to_string())
}
