//! Core types for aggregated search results.

use serde::{Deserialize, Serialize};

/// Thumbnail metadata attached to a result by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL.
    pub url: String,
    /// Width in pixels, when the provider reported a usable value.
    pub width: Option<u32>,
    /// Height in pixels, when the provider reported a usable value.
    pub height: Option<u32>,
}

/// A single search result.
///
/// Built once by the provider client and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result.
    pub link: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
    /// Optional thumbnail taken from the page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

impl SearchResultItem {
    /// Creates an item without a thumbnail.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
            thumbnail: None,
        }
    }

    /// Attaches a thumbnail descriptor.
    pub fn with_thumbnail(mut self, thumbnail: Thumbnail) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    /// Thumbnail URL, if any and non-empty.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail
            .as_ref()
            .map(|t| t.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// Ordered search results, in provider relevance order.
///
/// Carries no item limit of its own; the aggregator stops accumulating at
/// the requested count before building one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    items: Vec<SearchResultItem>,
}

impl ResultSet {
    /// Wraps already-ordered items.
    pub fn new(items: Vec<SearchResultItem>) -> Self {
        Self { items }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in rank order.
    pub fn items(&self) -> &[SearchResultItem] {
        &self.items
    }

    /// Iterates items in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchResultItem> {
        self.items.iter()
    }
}

impl From<Vec<SearchResultItem>> for ResultSet {
    fn from(items: Vec<SearchResultItem>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for ResultSet {
    type Item = SearchResultItem;
    type IntoIter = std::vec::IntoIter<SearchResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchResultItem;
    type IntoIter = std::slice::Iter<'a, SearchResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
