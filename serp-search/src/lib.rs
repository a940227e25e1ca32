//! # serp-search
//!
//! Paged web search aggregation for serp-report.
//!
//! The provider API hands out at most ten results per call. This crate
//! turns that into a single ordered [`ResultSet`] of any requested size and
//! optionally keeps a copy on disk so repeated identical queries on the same
//! day need no network call.
//!
//! ## Design
//!
//! - [`SearchProvider`] is the paged capability; [`CustomSearchEngine`]
//!   implements it over the Google Custom Search JSON API
//! - [`Aggregator`] issues the calls strictly in sequence and stops on an
//!   empty page or once enough items are held
//! - [`ResultCache`] stores result sets in `YYYY-MM/DD` buckets keyed by a
//!   SHA-256 of the query and count
//!
//! ## Security
//!
//! - The API key never appears in logs or error messages
//! - Queries are logged only at debug/trace level

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod engines;
pub mod error;
pub mod http;
pub mod provider;
pub mod types;

pub use aggregator::Aggregator;
pub use cache::{CacheKey, ResultCache, sanitize_query};
pub use config::{OffsetMode, SearchConfig};
pub use engines::CustomSearchEngine;
pub use error::{Result, SearchError};
pub use provider::{PAGE_SIZE, SearchProvider};
pub use types::{ResultSet, SearchResultItem, Thumbnail};

/// Search with the Custom Search API using `config`.
///
/// Convenience wrapper that builds a [`CustomSearchEngine`] and runs the
/// [`Aggregator`] with the configured offset mode.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for invalid or incomplete configuration
/// and the provider error for any failed call.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> serp_search::Result<()> {
/// let config = serp_search::SearchConfig {
///     api_key: Some("key".into()),
///     engine_id: Some("cx".into()),
///     ..Default::default()
/// };
/// let results = serp_search::search("rust lang", 25, &config).await?;
/// for item in &results {
///     println!("{}: {}", item.title, item.link);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, requested: u32, config: &SearchConfig) -> Result<ResultSet> {
    let engine = CustomSearchEngine::new(config.clone())?;
    Aggregator::new(engine)
        .with_offset_mode(config.offset_mode)
        .aggregate(query, requested)
        .await
}
