use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use feed_core::{FeedOutcome, ListingRecord, TerminalReason};
use feed_logging::feed_debug;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::filename::export_filename;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub record_count: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export path {0:?} exists and is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to create export directory {path:?}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write export {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    query: &'a str,
    scraped_utc: &'a str,
    terminal_reason: TerminalReason,
    pages_visited: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'a str>,
    record_count: usize,
    records: &'a [ListingRecord],
}

/// Writes the session outcome for `query` as pretty JSON into `output_dir`,
/// creating the directory when missing. An earlier export for the same query
/// is replaced in one rename, so readers see either the old file or the new
/// one.
///
/// Records are written in aggregation order, duplicates included.
pub fn export_records(
    output_dir: &Path,
    query: &str,
    outcome: &FeedOutcome,
    scraped_utc: &str,
) -> Result<ExportSummary, ExportError> {
    let document = ExportDocument {
        query,
        scraped_utc,
        terminal_reason: outcome.terminal_reason,
        pages_visited: outcome.pages_visited,
        failure: outcome.failure.as_deref(),
        record_count: outcome.records.len(),
        records: &outcome.records,
    };
    let content = serde_json::to_string_pretty(&document)?;

    prepare_output_dir(output_dir)?;
    let output_path = output_dir.join(export_filename(query));
    write_replacing(&output_path, content.as_bytes()).map_err(|source| ExportError::Write {
        path: output_path.clone(),
        source,
    })?;
    feed_debug!("export written to {}", output_path.display());

    Ok(ExportSummary {
        record_count: outcome.records.len(),
        output_path,
    })
}

fn prepare_output_dir(dir: &Path) -> Result<(), ExportError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ExportError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(ExportError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// The temp file lives next to `target` so the final rename stays on one
/// filesystem.
fn write_replacing(target: &Path, content: &[u8]) -> io::Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|err| err.error)?;
    Ok(())
}
