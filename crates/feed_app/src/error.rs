use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("no search url given (use --url or search_url in the config)")]
    MissingSearchUrl,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("browser error: {0}")]
    Browser(String),
    #[error("failed to read snapshot {path:?}: {source}")]
    Snapshot { path: PathBuf, source: io::Error },
}
