//! Capability provider ports - interfaces for external information services.
//!
//! The orchestration core never inspects provider internals. Workers call
//! these traits and decide themselves how to handle a [`ProviderError`].

use async_trait::async_trait;

use crate::domain::errors::ProviderError;
use crate::domain::models::{SearchHit, SearchOptions};

/// Web search capability.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name used in logs and gap notes.
    fn name(&self) -> &'static str;

    /// Run one query and return unstructured results.
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, ProviderError>;
}

/// Page fetch capability.
#[async_trait]
pub trait ScrapeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch a page and return its readable text.
    async fn scrape(&self, url: &str) -> Result<String, ProviderError>;
}
