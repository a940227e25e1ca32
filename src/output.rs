//! Report file naming and writing.

use std::io::Write;
use std::path::{Path, PathBuf};

use serp_search::sanitize_query;
use tempfile::NamedTempFile;

use crate::error::{ReportError, Result};

/// Default report file name for `query` and `limit`: `Search[<query>]-<limit>.pdf`.
pub fn default_file_name(query: &str, limit: u32) -> String {
    format!("Search[{}]-{limit}.pdf", sanitize_query(query.trim()))
}

/// Default report path in the current directory.
pub fn default_output_path(query: &str, limit: u32) -> PathBuf {
    PathBuf::from(default_file_name(query, limit))
}

/// Write `bytes` to `path`, replacing any existing file in one step.
///
/// Parent directories are created. The content goes to a temporary file in
/// the same directory first, so readers never see a half-written report.
///
/// # Errors
///
/// Returns [`ReportError::Output`] naming `path` on any filesystem failure.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let output_error = |source: std::io::Error| ReportError::Output {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(output_error)?;

    let mut staged = NamedTempFile::new_in(parent).map_err(output_error)?;
    staged.write_all(bytes).map_err(output_error)?;
    staged.as_file().sync_all().map_err(output_error)?;
    staged.persist(path).map_err(|e| output_error(e.error))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(())
}
