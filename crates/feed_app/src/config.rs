use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use feed_engine::{ExtractionMode, ScrapeSettings, SettlePolicy};
use serde::Deserialize;

use crate::ConfigError;

/// On-disk RON configuration. Every field is optional; anything left out
/// keeps the engine default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub search_url: Option<String>,
    pub query: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub max_pages: Option<u32>,
    pub extraction: Option<ExtractionSetting>,
    pub keep_query: Option<bool>,
    pub selectors: SelectorOverrides,
    pub scroll: ScrollOverrides,
    pub pagination: PaginationOverrides,
    /// Replace fixed settle delays with polling on the listing count.
    pub poll_until_stable: Option<PollConfig>,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum ExtractionSetting {
    PerListing,
    ParallelLists,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectorOverrides {
    pub no_results: Option<String>,
    pub scroll_anchor: Option<String>,
    pub listing: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub location: Option<String>,
    pub employer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrollOverrides {
    pub steps: Option<u32>,
    pub dx: Option<i64>,
    pub dy: Option<i64>,
    pub settle_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaginationOverrides {
    pub control_template: Option<String>,
    pub settle_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    /// DevTools websocket of an already running, signed-in browser.
    pub connect: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
    /// Wait after navigation before the first page is read.
    pub initial_wait_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            connect: None,
            window_width: 1280,
            window_height: 1024,
            initial_wait_ms: 3_000,
        }
    }
}

pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

pub fn parse(content: &str) -> Result<FileConfig, String> {
    ron::from_str(content).map_err(|err| err.to_string())
}

impl FileConfig {
    pub fn scrape_settings(&self) -> ScrapeSettings {
        let mut settings = ScrapeSettings::default();
        if let Some(max_pages) = self.max_pages {
            settings.max_pages = max_pages;
        }
        if let Some(mode) = self.extraction {
            settings.extraction_mode = match mode {
                ExtractionSetting::PerListing => ExtractionMode::PerListing,
                ExtractionSetting::ParallelLists => ExtractionMode::ParallelLists,
            };
        }
        if let Some(keep_query) = self.keep_query {
            settings.keep_query = keep_query;
        }

        let sel = &mut settings.selectors;
        let overrides = &self.selectors;
        for (target, value) in [
            (&mut sel.no_results, &overrides.no_results),
            (&mut sel.scroll_anchor, &overrides.scroll_anchor),
            (&mut sel.listing, &overrides.listing),
            (&mut sel.title, &overrides.title),
            (&mut sel.link, &overrides.link),
            (&mut sel.location, &overrides.location),
            (&mut sel.employer, &overrides.employer),
        ] {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        let scroll = &mut settings.scroll;
        if let Some(steps) = self.scroll.steps {
            scroll.steps = steps;
        }
        if let Some(dx) = self.scroll.dx {
            scroll.dx = dx;
        }
        if let Some(dy) = self.scroll.dy {
            scroll.dy = dy;
        }
        if let Some(ms) = self.scroll.settle_ms {
            scroll.settle = SettlePolicy::fixed_millis(ms);
        }

        if let Some(template) = &self.pagination.control_template {
            settings.pagination.control_template = template.clone();
        }
        if let Some(ms) = self.pagination.settle_ms {
            settings.pagination.settle = SettlePolicy::fixed_millis(ms);
        }

        match self.poll_until_stable {
            Some(poll) => settings.poll_until_stable(
                Duration::from_millis(poll.interval_ms),
                poll.max_attempts,
            ),
            None => settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_keeps_engine_defaults() {
        let config = parse("()").unwrap();
        let settings = config.scrape_settings();
        let defaults = ScrapeSettings::default();

        assert_eq!(settings.max_pages, defaults.max_pages);
        assert_eq!(settings.selectors, defaults.selectors);
        assert_eq!(settings.scroll, defaults.scroll);
        assert!(config.browser.headless);
    }

    #[test]
    fn overrides_are_applied() {
        let config = parse(
            r#"(
                search_url: Some("https://jobs.example.com/search/?keywords=rust"),
                max_pages: Some(2),
                extraction: Some(ParallelLists),
                selectors: (title: Some(".card h3")),
                scroll: (steps: Some(3), settle_ms: Some(500)),
                pagination: (control_template: Some("a[data-page='{page}']")),
                browser: (headless: false),
            )"#,
        )
        .unwrap();
        let settings = config.scrape_settings();

        assert_eq!(settings.max_pages, 2);
        assert_eq!(settings.extraction_mode, ExtractionMode::ParallelLists);
        assert_eq!(settings.selectors.title, ".card h3");
        assert_eq!(settings.selectors.listing, ".job-card-container");
        assert_eq!(settings.scroll.steps, 3);
        assert_eq!(settings.scroll.settle, SettlePolicy::fixed_millis(500));
        assert_eq!(settings.pagination.control_selector(5), "a[data-page='5']");
        assert!(!config.browser.headless);
        assert_eq!(config.browser.initial_wait_ms, 3_000);
    }

    #[test]
    fn polling_replaces_fixed_delays() {
        let config =
            parse("(poll_until_stable: Some((interval_ms: 200, max_attempts: 15)))").unwrap();
        let settings = config.scrape_settings();

        let expected = SettlePolicy::UntilStable {
            selector: ".job-card-container".to_string(),
            interval: Duration::from_millis(200),
            max_attempts: 15,
        };
        assert_eq!(settings.scroll.settle, expected);
        assert_eq!(settings.pagination.settle, expected);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(parse("(max_pages: \"four\")").is_err());
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("feed.ron");
        fs::write(&path, "(query: Some(\"rust\"), output_dir: Some(\"exports\"))").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.query.as_deref(), Some("rust"));
        assert_eq!(config.output_dir, Some(PathBuf::from("exports")));

        let missing = load(&dir.path().join("absent.ron"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
