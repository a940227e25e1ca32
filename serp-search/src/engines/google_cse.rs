//! Google Custom Search JSON API client.
//!
//! One call maps to `GET <endpoint>?key=..&cx=..&q=..&start=..` and returns
//! at most ten items. Thumbnails come from `pagemap.cse_thumbnail[0]`.

use serde::Deserialize;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{SearchResultItem, Thumbnail};

/// Custom Search JSON API backend.
pub struct CustomSearchEngine {
    client: reqwest::Client,
    config: SearchConfig,
}

impl CustomSearchEngine {
    /// Creates a client for the given configuration.
    ///
    /// Identity is not checked here; see [`SearchProvider::ensure_identity`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid endpoint or timeout and
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl SearchProvider for CustomSearchEngine {
    async fn list(&self, query: &str, start: u32) -> Result<Vec<SearchResultItem>, SearchError> {
        let (key, cx) = self.config.require_identity()?;
        tracing::trace!(query, start, "custom search request");

        let start = start.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("key", key), ("cx", cx), ("q", query), ("start", start.as_str())])
            .send()
            .await
            // The request URL carries the API key; keep it out of messages.
            .map_err(|e| {
                SearchError::Http(format!("custom search request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SearchError::Http(format!("custom search response read failed: {}", e.without_url()))
        })?;

        if !status.is_success() {
            return Err(map_api_error(status.as_u16(), &body));
        }

        tracing::trace!(bytes = body.len(), "custom search response received");
        parse_list_response(&body)
    }

    fn ensure_identity(&self) -> Result<(), SearchError> {
        self.config.require_identity().map(|_| ())
    }

    fn name(&self) -> &'static str {
        "google-cse"
    }
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    pagemap: Option<PageMap>,
}

#[derive(Deserialize)]
struct PageMap {
    #[serde(default)]
    cse_thumbnail: Vec<RawThumbnail>,
}

#[derive(Deserialize)]
struct RawThumbnail {
    #[serde(default)]
    src: String,
    #[serde(default)]
    width: Option<Value>,
    #[serde(default)]
    height: Option<Value>,
}

impl From<RawItem> for SearchResultItem {
    fn from(raw: RawItem) -> Self {
        let thumbnail = raw
            .pagemap
            .and_then(|pm| pm.cse_thumbnail.into_iter().next())
            .filter(|t| !t.src.is_empty())
            .map(|t| Thumbnail {
                url: t.src,
                width: t.width.as_ref().and_then(parse_dimension),
                height: t.height.as_ref().and_then(parse_dimension),
            });

        Self {
            title: raw.title,
            link: raw.link,
            snippet: raw.snippet,
            thumbnail,
        }
    }
}

/// Pixel dimensions arrive as strings (`"225"`) but tolerate numbers too.
fn parse_dimension(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        _ => None,
    }
}

/// Parse a `cse.list` response body into items.
///
/// A response without an `items` array is an empty page.
pub(crate) fn parse_list_response(body: &str) -> Result<Vec<SearchResultItem>, SearchError> {
    let response: ListResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid custom search response: {e}")))?;
    Ok(response.items.into_iter().map(SearchResultItem::from).collect())
}

/// Map a non-success response to [`SearchError::Api`], preferring the
/// provider's `error.message`.
fn map_api_error(status: u16, body: &str) -> SearchError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned());

    SearchError::Api { status, message }
}
