//! Result aggregator: sequential paged calls accumulated up to a count.
//!
//! The provider caps each call at [`PAGE_SIZE`] items, so larger requests
//! are served by issuing `ceil(requested / PAGE_SIZE)` calls one after the
//! other, each shifted by the `start` offset.

use crate::config::OffsetMode;
use crate::error::SearchError;
use crate::provider::{PAGE_SIZE, SearchProvider};
use crate::types::ResultSet;

/// Drives a [`SearchProvider`] page by page.
#[derive(Debug)]
pub struct Aggregator<P> {
    provider: P,
    offset_mode: OffsetMode,
}

impl<P: SearchProvider> Aggregator<P> {
    /// Creates an aggregator using the legacy offset arithmetic.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            offset_mode: OffsetMode::Legacy,
        }
    }

    /// Overrides the offset arithmetic.
    pub fn with_offset_mode(mut self, offset_mode: OffsetMode) -> Self {
        self.offset_mode = offset_mode;
        self
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Number of calls planned for `requested` items.
    pub fn planned_calls(requested: u32) -> u32 {
        requested.div_ceil(PAGE_SIZE)
    }

    /// Collect up to `requested` items for `query`.
    ///
    /// # Pipeline
    ///
    /// 1. Check the provider identity (no call is made without it)
    /// 2. Issue up to `ceil(requested / 10)` calls, strictly in sequence
    /// 3. Stop early on an empty page, or as soon as `requested` items are
    ///    held, even mid-page
    ///
    /// A short result set is still a success when the provider runs dry.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] when `requested` is zero or the
    /// identity is missing, and the provider's error for any failed call.
    /// Nothing is retried and partial results are discarded on error.
    pub async fn aggregate(&self, query: &str, requested: u32) -> Result<ResultSet, SearchError> {
        if requested == 0 {
            return Err(SearchError::Config(
                "requested result count must be at least 1".into(),
            ));
        }
        self.provider.ensure_identity()?;

        let planned = Self::planned_calls(requested);
        let target = requested as usize;
        let mut items = Vec::with_capacity(target.min(100));

        'calls: for call in 0..planned {
            let start = self.offset_mode.start_for(call, PAGE_SIZE);
            tracing::debug!(
                provider = self.provider.name(),
                call = call + 1,
                planned,
                start,
                "requesting result page"
            );

            let page = self.provider.list(query, start).await?;
            if page.is_empty() {
                tracing::debug!(start, "empty page, no more results upstream");
                break;
            }

            for item in page {
                items.push(item);
                if items.len() >= target {
                    break 'calls;
                }
            }
        }

        tracing::debug!(count = items.len(), requested, "aggregation finished");
        Ok(ResultSet::new(items))
    }
}
