mod cli;
mod config;
mod error;
mod logging;
mod session;

use std::path::PathBuf;

use chrono::Utc;
use feed_core::TerminalReason;
use feed_engine::export_records;
use feed_logging::{feed_info, feed_warn};
use clap::Parser;
use log::LevelFilter;

use cli::CliArgs;
use config::FileConfig;
use session::SessionSource;

pub(crate) use error::{ConfigError, SessionError};

const DEFAULT_OUTPUT_DIR: &str = "output";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(args.log, level);

    let file_config = match &args.config {
        Some(path) => config::load(path)?,
        None => FileConfig::default(),
    };

    let mut settings = file_config.scrape_settings();
    if let Some(max_pages) = args.max_pages {
        settings.max_pages = max_pages;
    }

    let url = args.url.clone().or_else(|| file_config.search_url.clone());
    let query = args
        .query
        .clone()
        .or_else(|| file_config.query.clone())
        .or_else(|| url.clone())
        .unwrap_or_else(|| "listings".to_string());

    let source = if args.replay.is_empty() {
        let mut browser = file_config.browser.clone();
        if args.headful {
            browser.headless = false;
        }
        if args.connect.is_some() {
            browser.connect = args.connect.clone();
        }
        SessionSource::Browser {
            url: url.ok_or(ConfigError::MissingSearchUrl)?,
            browser,
        }
    } else {
        SessionSource::Replay {
            pages: args.replay.clone(),
            base_url: url,
        }
    };

    let outcome = session::run(source, settings)?;
    if outcome.terminal_reason == TerminalReason::ReadFailure {
        feed_warn!("session ended early, exporting the partial result");
    }

    let output_dir = args
        .out
        .clone()
        .or_else(|| file_config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let scraped_utc = Utc::now().to_rfc3339();
    let summary = export_records(&output_dir, &query, &outcome, &scraped_utc)?;
    feed_info!(
        "wrote {} listings to {}",
        summary.record_count,
        summary.output_path.display()
    );

    Ok(())
}
