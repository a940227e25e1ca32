//! End-to-end report run: cache lookup, search, cache store, render, write.

use std::path::PathBuf;

use serp_search::{Aggregator, ResultCache, ResultSet, SearchProvider};

use crate::error::Result;
use crate::output;
use crate::report::{DEFAULT_TITLE, ReportEngine, ReportOptions};
use crate::thumbnail::ThumbnailFetcher;

/// One report invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Search term, already trimmed and non-empty.
    pub query: String,
    /// Requested result count, at least 1.
    pub limit: u32,
    /// Consult and update the on-disk result cache.
    pub use_cache: bool,
    /// Draw result thumbnails.
    pub thumbnails: bool,
    /// Report file path.
    pub output: PathBuf,
}

impl RunRequest {
    /// Request with caching and thumbnails off, written to the default file name.
    pub fn new(query: impl Into<String>, limit: u32) -> Self {
        let query = query.into();
        let output = output::default_output_path(&query, limit);
        Self {
            query,
            limit,
            use_cache: false,
            thumbnails: false,
            output,
        }
    }
}

/// Results gathered for a run, and where they came from.
#[derive(Debug, Clone)]
pub struct Collected {
    pub results: ResultSet,
    pub from_cache: bool,
    /// `Some(false)` when caching was requested but the store failed.
    pub cache_saved: Option<bool>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub results: usize,
    pub from_cache: bool,
    pub cache_saved: Option<bool>,
    pub pages: usize,
    pub output: PathBuf,
}

/// Drives one report from query to file.
#[derive(Debug)]
pub struct Pipeline<P> {
    aggregator: Aggregator<P>,
    cache: ResultCache,
    title: String,
    fetcher: Option<ThumbnailFetcher>,
}

impl<P: SearchProvider> Pipeline<P> {
    pub fn new(aggregator: Aggregator<P>, cache: ResultCache) -> Self {
        Self {
            aggregator,
            cache,
            title: DEFAULT_TITLE.to_owned(),
            fetcher: None,
        }
    }

    /// Report title printed on the first page.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Use `fetcher` for thumbnails instead of building one per run.
    pub fn with_fetcher(mut self, fetcher: ThumbnailFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Get results for `query`, from the cache when allowed and present.
    ///
    /// A fresh result set is stored when caching is on. A failed store is
    /// logged and reported in [`Collected::cache_saved`], never raised.
    ///
    /// # Errors
    ///
    /// Returns the search error when results have to be fetched and the
    /// search fails.
    pub async fn collect(&self, query: &str, limit: u32, use_cache: bool) -> Result<Collected> {
        if use_cache {
            if let Some(results) = self.cache.lookup(query, limit) {
                tracing::info!(count = results.len(), "using cached results");
                return Ok(Collected {
                    results,
                    from_cache: true,
                    cache_saved: None,
                });
            }
        }

        let results = self.aggregator.aggregate(query, limit).await?;
        tracing::info!(count = results.len(), requested = limit, "search complete");

        let cache_saved = if use_cache {
            let saved = self.cache.store(&results, query, limit);
            if !saved {
                tracing::warn!("failed to save results to cache");
            }
            Some(saved)
        } else {
            None
        };

        Ok(Collected {
            results,
            from_cache: false,
            cache_saved,
        })
    }

    /// The injected fetcher, or a fresh one. `None` if no client can be built.
    fn thumbnail_fetcher(&self) -> Option<ThumbnailFetcher> {
        if let Some(fetcher) = &self.fetcher {
            return Some(fetcher.clone());
        }
        ThumbnailFetcher::new()
            .map_err(|e| tracing::warn!(error = %e, "could not create thumbnail client"))
            .ok()
    }

    /// Run the whole pipeline for `request`.
    ///
    /// # Errors
    ///
    /// Returns a search error, a render error, or an output error. Cache and
    /// thumbnail failures, including a thumbnail client that cannot be
    /// built, do not fail the run.
    pub async fn execute(&self, request: &RunRequest) -> Result<RunSummary> {
        let collected = self
            .collect(&request.query, request.limit, request.use_cache)
            .await?;

        let options = ReportOptions::new(request.query.clone(), request.limit)
            .with_title(self.title.clone())
            .with_thumbnails(request.thumbnails);
        let mut engine = ReportEngine::new(options);
        if request.thumbnails {
            match self.thumbnail_fetcher() {
                Some(fetcher) => engine = engine.with_fetcher(fetcher),
                None => tracing::warn!("thumbnails unavailable, rendering text only"),
            }
        }

        let rendered = engine.render(&collected.results).await?;
        output::write_atomically(&request.output, &rendered.bytes)?;
        tracing::info!(
            path = %request.output.display(),
            pages = rendered.pages,
            "report saved"
        );

        Ok(RunSummary {
            results: collected.results.len(),
            from_cache: collected.from_cache,
            cache_saved: collected.cache_saved,
            pages: rendered.pages,
            output: request.output.clone(),
        })
    }
}
