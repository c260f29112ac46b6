#![deny(missing_docs)]
//! Shared logging utilities for the feed harvester workspace.
//!
//! This crate provides the `feed_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every macro prefixes
//! its message with the results page the current thread is working on, so a
//! session log reads as a page-by-page trace.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the results page currently being scraped.
    static PAGE_INDEX: Cell<u32> = const { Cell::new(0) };
}

/// Sets the results page index for the current thread.
/// The feed scraper calls this whenever it moves to a new page.
pub fn set_page_index(page: u32) {
    PAGE_INDEX.with(|v| v.set(page));
}

/// Retrieves the results page index for the current thread.
/// Returns 0 outside of a scraping session.
pub fn page_index() -> u32 {
    PAGE_INDEX.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! feed_trace {
    ($($arg:tt)*) => {{
        log::trace!("[page {}] {}", $crate::page_index(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! feed_info {
    ($($arg:tt)*) => {{
        log::info!("[page {}] {}", $crate::page_index(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! feed_debug {
    ($($arg:tt)*) => {{
        log::debug!("[page {}] {}", $crate::page_index(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! feed_warn {
    ($($arg:tt)*) => {{
        log::warn!("[page {}] {}", $crate::page_index(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! feed_error {
    ($($arg:tt)*) => {{
        log::error!("[page {}] {}", $crate::page_index(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
