//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] carries the provider identity (API key and search engine
//! id), the endpoint, HTTP behaviour, and the paging offset mode used by the
//! aggregator.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default Custom Search JSON API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// How the aggregator computes the 1-based `start` offset of each call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// `start = 1 + call_index * 10` with `call_index` starting at 1.
    ///
    /// The first call therefore begins at result 11. Kept as the default so
    /// result ordering matches reports produced by earlier releases.
    #[default]
    Legacy,
    /// `start = 1 + call_index * 10` with `call_index` starting at 0.
    FromFirstPage,
}

impl OffsetMode {
    /// The `start` parameter for the call numbered `call` (0-based issue
    /// order).
    pub fn start_for(self, call: u32, page_size: u32) -> u32 {
        match self {
            Self::Legacy => 1 + (call + 1) * page_size,
            Self::FromFirstPage => 1 + call * page_size,
        }
    }
}

/// Configuration for the search provider and aggregator.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Developer API key. `None` or empty means not configured.
    pub api_key: Option<String>,
    /// Programmable search engine id (`cx`). `None` or empty means not configured.
    pub engine_id: Option<String>,
    /// Base URL of the JSON API.
    pub endpoint: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Verify TLS certificates of the search API. Disabled by `--no-verify`.
    pub verify_tls: bool,
    /// Paging offset arithmetic.
    pub offset_mode: OffsetMode,
    /// Custom User-Agent string. Defaults to the crate name and version.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_seconds: 30,
            verify_tls: true,
            offset_mode: OffsetMode::Legacy,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates the transport settings.
    ///
    /// Checks:
    /// - `endpoint` parses as an absolute http(s) URL
    /// - `timeout_seconds` must be greater than 0
    ///
    /// Identity (key and engine id) is checked separately by
    /// [`SearchConfig::require_identity`] so that a missing key surfaces as
    /// an aggregation failure rather than at construction time.
    pub fn validate(&self) -> Result<(), SearchError> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| SearchError::Config(format!("invalid endpoint {}: {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "endpoint must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Returns `(api_key, engine_id)` or a config error naming the missing value.
    pub fn require_identity(&self) -> Result<(&str, &str), SearchError> {
        let key = non_empty(self.api_key.as_deref()).ok_or_else(|| {
            SearchError::Config("API Key is not defined, update configuration file".into())
        })?;
        let cx = non_empty(self.engine_id.as_deref()).ok_or_else(|| {
            SearchError::Config(
                "Search Engine ID is not defined, update configuration file".into(),
            )
        })?;
        Ok((key, cx))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
