//! Capability provider adapters.

pub mod mock;
pub mod null;
pub mod retry;
pub mod scrape;
pub mod serper;

pub use mock::{MockScrapeProvider, MockSearchProvider};
pub use null::{NullScrapeProvider, NullSearchProvider};
pub use retry::RetryPolicy;
pub use scrape::HttpScrapeProvider;
pub use serper::SerperSearchProvider;

use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::{ScrapeProvider, SearchProvider};

/// Build the search provider described by the configuration.
///
/// A missing API key or an unknown provider degrades to [`NullSearchProvider`].
pub fn search_provider(config: &Config) -> Arc<dyn SearchProvider> {
    let retry = RetryPolicy::from(&config.retry);
    match (config.search.provider.as_str(), config.search.api_key.as_deref()) {
        ("serper", Some(key)) if !key.trim().is_empty() => {
            match SerperSearchProvider::new(&config.search, key.trim(), retry) {
                Ok(provider) => Arc::new(provider),
                Err(e) => {
                    tracing::warn!(error = %e, "search provider unavailable");
                    Arc::new(NullSearchProvider)
                }
            }
        }
        ("serper", _) => {
            tracing::warn!("no search API key configured; searches return no results");
            Arc::new(NullSearchProvider)
        }
        (other, _) => {
            if other != "none" {
                tracing::warn!(provider = other, "unknown search provider");
            }
            Arc::new(NullSearchProvider)
        }
    }
}

pub fn scrape_provider(config: &Config) -> Arc<dyn ScrapeProvider> {
    match HttpScrapeProvider::new(&config.scrape, RetryPolicy::from(&config.retry)) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::warn!(error = %e, "page fetching unavailable");
            Arc::new(NullScrapeProvider)
        }
    }
}
