//! Centralized application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Cache | `~/Library/Application Support/serp-report/` | `~/.local/share/serp-report/` |
//! | Config | `~/Library/Application Support/serp-report/` | `~/.config/serp-report/` |
//!
//! # Environment Overrides
//!
//! - `SERP_REPORT_DATA_DIR`: overrides [`data_dir`]
//! - `SERP_REPORT_CONFIG_DIR`: overrides [`config_dir`]

use std::path::PathBuf;

const APP_NAME: &str = "serp-report";

/// Application data root directory.
///
/// The result cache lives in `.cache/` below it.
///
/// Resolves to `dirs::data_dir()/serp-report/` by default. Override with
/// the `SERP_REPORT_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SERP_REPORT_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("serp-report-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/serp-report/` by default. Override with
/// the `SERP_REPORT_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SERP_REPORT_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("serp-report-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
