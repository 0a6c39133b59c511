//! Providers used when no external service is configured.
//!
//! Both return empty results; the factory logs a warning once when it
//! falls back to them.

use async_trait::async_trait;

use crate::domain::errors::ProviderError;
use crate::domain::models::{SearchHit, SearchOptions};
use crate::domain::ports::{ScrapeProvider, SearchProvider};

#[derive(Debug, Clone, Default)]
pub struct NullSearchProvider;

#[async_trait]
impl SearchProvider for NullSearchProvider {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn search(&self, query: &str, _options: &SearchOptions) -> Result<Vec<SearchHit>, ProviderError> {
        tracing::trace!(query, "search skipped, no provider configured");
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NullScrapeProvider;

#[async_trait]
impl ScrapeProvider for NullScrapeProvider {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn scrape(&self, _url: &str) -> Result<String, ProviderError> {
        Ok(String::new())
    }
}
