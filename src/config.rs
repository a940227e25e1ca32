//! Application configuration loaded from `config.toml`.
//!
//! ```toml
//! [search]
//! api_key = "..."
//! engine_id = "..."
//! endpoint = "https://www.googleapis.com/customsearch/v1"
//! timeout_seconds = 30
//!
//! [report]
//! title = "Google Custom Search"
//!
//! [storage]
//! data_dir = "/path/to/app_dir"
//! ```
//!
//! Every section and field is optional. The placeholder values shipped in
//! the sample file (`YOUR_API_KEY`, `YOUR_SEARCH_ENGINE_ID`) count as unset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serp_search::{OffsetMode, SearchConfig};

use crate::error::{ReportError, Result};

/// Placeholder API key from the sample config.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";
/// Placeholder engine id from the sample config.
pub const PLACEHOLDER_ENGINE_ID: &str = "YOUR_SEARCH_ENGINE_ID";

/// Search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Developer API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Programmable search engine id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<String>,
    /// JSON API endpoint.
    pub endpoint: String,
    /// HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            api_key: None,
            engine_id: None,
            endpoint: defaults.endpoint,
            timeout_seconds: defaults.timeout_seconds,
        }
    }
}

/// Report appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Bold title line at the top of the first page.
    pub title: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            title: crate::report::DEFAULT_TITLE.to_owned(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Application dir holding `.cache/`. Defaults to [`crate::app_dirs::data_dir`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[search]` section.
    pub search: SearchSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[storage]` section.
    pub storage: StorageSection,
}

/// Per-invocation values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct SearchOverrides {
    /// `--key`.
    pub api_key: Option<String>,
    /// `--id`.
    pub engine_id: Option<String>,
    /// `--no-verify`.
    pub skip_tls_verify: bool,
    /// `--from-first-page`.
    pub from_first_page: bool,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))
    }

    /// Load `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ReportError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }

    /// Application dir for the result cache.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(crate::app_dirs::data_dir)
    }

    /// Build the search configuration, applying `overrides` over the file.
    pub fn search_config(&self, overrides: &SearchOverrides) -> SearchConfig {
        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| configured(self.search.api_key.as_deref(), PLACEHOLDER_API_KEY));
        let engine_id = overrides
            .engine_id
            .clone()
            .or_else(|| configured(self.search.engine_id.as_deref(), PLACEHOLDER_ENGINE_ID));

        SearchConfig {
            api_key,
            engine_id,
            endpoint: self.search.endpoint.clone(),
            timeout_seconds: self.search.timeout_seconds,
            verify_tls: !overrides.skip_tls_verify,
            offset_mode: if overrides.from_first_page {
                OffsetMode::FromFirstPage
            } else {
                OffsetMode::Legacy
            },
            user_agent: None,
        }
    }
}

/// A value counts as configured when present, non-blank, and not the sample
/// placeholder.
fn configured(value: Option<&str>, placeholder: &str) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != placeholder)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert!(config.search.api_key.is_none());
        assert_eq!(config.search.timeout_seconds, 30);
        assert_eq!(config.report.title, "Google Custom Search");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [search]
            api_key = "abc"
            "#,
        )
        .expect("parse");
        assert_eq!(config.search.api_key.as_deref(), Some("abc"));
        assert_eq!(config.search.endpoint, serp_search::config::DEFAULT_ENDPOINT);
        assert_eq!(config.report.title, "Google Custom Search");
    }

    #[test]
    fn placeholders_count_as_unset() {
        let mut config = AppConfig::default();
        config.search.api_key = Some(PLACEHOLDER_API_KEY.into());
        config.search.engine_id = Some(PLACEHOLDER_ENGINE_ID.into());
        let search = config.search_config(&SearchOverrides::default());
        assert!(search.api_key.is_none());
        assert!(search.engine_id.is_none());
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config = AppConfig::default();
        config.search.api_key = Some("from-file".into());
        config.search.engine_id = Some("cx-file".into());
        let overrides = SearchOverrides {
            api_key: Some("from-cli".into()),
            engine_id: None,
            skip_tls_verify: true,
            from_first_page: true,
        };
        let search = config.search_config(&overrides);
        assert_eq!(search.api_key.as_deref(), Some("from-cli"));
        assert_eq!(search.engine_id.as_deref(), Some("cx-file"));
        assert!(!search.verify_tls);
        assert_eq!(search.offset_mode, OffsetMode::FromFirstPage);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.search.engine_id = Some("cx-1".into());
        config.report.title = "Weekly digest".into();
        config.save_to_file(&path).expect("save");

        let loaded = AppConfig::from_file(&path).expect("load");
        assert_eq!(loaded.search.engine_id.as_deref(), Some("cx-1"));
        assert_eq!(loaded.report.title, "Weekly digest");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).expect("load");
        assert!(config.search.api_key.is_none());
    }

    #[test]
    fn invalid_toml_returns_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn storage_override_used_for_data_dir() {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/serp"));
        assert_eq!(config.data_dir(), PathBuf::from("/srv/serp"));
    }
}
