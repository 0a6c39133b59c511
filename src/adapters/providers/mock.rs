//! In-memory providers for tests and offline runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::ProviderError;
use crate::domain::models::{SearchHit, SearchOptions};
use crate::domain::ports::{ScrapeProvider, SearchProvider};

/// Search provider answering from a canned table.
///
/// Queries are matched by substring; unmatched queries return no hits.
#[derive(Clone, Default)]
pub struct MockSearchProvider {
    responses: Arc<RwLock<Vec<(String, Result<Vec<SearchHit>, ProviderError>)>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn respond(&self, pattern: impl Into<String>, hits: Vec<SearchHit>) {
        self.responses.write().await.push((pattern.into(), Ok(hits)));
    }

    pub async fn fail(&self, pattern: impl Into<String>, error: ProviderError) {
        self.responses.write().await.push((pattern.into(), Err(error)));
    }

    /// Queries received so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>, ProviderError> {
        self.calls.write().await.push(query.to_string());
        let responses = self.responses.read().await;
        match responses.iter().find(|(pattern, _)| query.contains(pattern.as_str())) {
            Some((_, Ok(hits))) => Ok(hits.iter().take(options.limit).cloned().collect()),
            Some((_, Err(e))) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }
}

/// Scrape provider serving fixed page texts by URL.
#[derive(Clone, Default)]
pub struct MockScrapeProvider {
    pages: Arc<RwLock<HashMap<String, String>>>,
}

impl MockScrapeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn page(&self, url: impl Into<String>, text: impl Into<String>) {
        self.pages.write().await.insert(url.into(), text.into());
    }
}

#[async_trait]
impl ScrapeProvider for MockScrapeProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn scrape(&self, url: &str) -> Result<String, ProviderError> {
        self.pages
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("no page at {url}")))
    }
}
