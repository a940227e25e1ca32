//! Trait definition for the paged search capability.
//!
//! [`SearchProvider`] is the seam between the aggregator and the network:
//! the Custom Search client implements it over HTTP and tests implement it
//! with canned pages.

use crate::error::SearchError;
use crate::types::SearchResultItem;

/// Maximum number of items a provider returns per call.
pub const PAGE_SIZE: u32 = 10;

/// A paged search backend.
///
/// One call returns at most [`PAGE_SIZE`] items starting at the 1-based
/// offset `start`. An empty page means the provider has nothing more.
///
/// All implementations must be `Send + Sync`.
pub trait SearchProvider: Send + Sync {
    /// Fetch one page of results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails or the response cannot
    /// be decoded.
    fn list(
        &self,
        query: &str,
        start: u32,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResultItem>, SearchError>> + Send;

    /// Checks that the provider has the identity it needs before any call.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] naming the missing value.
    fn ensure_identity(&self) -> Result<(), SearchError> {
        Ok(())
    }

    /// Human-readable provider name for logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProvider {
        items: Vec<SearchResultItem>,
    }

    impl SearchProvider for StaticProvider {
        async fn list(
            &self,
            _query: &str,
            start: u32,
        ) -> Result<Vec<SearchResultItem>, SearchError> {
            if start > 1 {
                return Ok(vec![]);
            }
            Ok(self.items.clone())
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    #[test]
    fn provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StaticProvider>();
    }

    #[tokio::test]
    async fn static_provider_returns_page() {
        let provider = StaticProvider {
            items: vec![SearchResultItem::new("Test", "https://test.com", "snippet")],
        };
        let page = provider.list("test", 1).await.expect("page");
        assert_eq!(page.len(), 1);
        assert!(provider.list("test", 11).await.expect("page").is_empty());
    }

    #[test]
    fn default_identity_check_passes() {
        let provider = StaticProvider { items: vec![] };
        assert!(provider.ensure_identity().is_ok());
        assert_eq!(provider.name(), "static");
    }
}
