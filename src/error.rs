//! Error types for the report pipeline.

use std::path::PathBuf;

use serp_search::SearchError;

/// Top-level error type for serp-report.
///
/// Only search failures and output failures abort a run; cache and
/// thumbnail problems are absorbed where they happen.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Search configuration or transport failure.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// Configuration file or directory error.
    #[error("config error: {0}")]
    Config(String),

    /// The laid-out document could not be encoded.
    #[error("render error: {0}")]
    Render(String),

    /// The report file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ReportError>;
