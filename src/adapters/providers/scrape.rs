//! HTTP page fetcher converting HTML to Markdown-ish text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::retry::RetryPolicy;
use crate::domain::errors::ProviderError;
use crate::domain::models::ScrapeConfig;
use crate::domain::ports::ScrapeProvider;

const USER_AGENT: &str = concat!("osint-swarm/", env!("CARGO_PKG_VERSION"));

pub struct HttpScrapeProvider {
    http: Client,
    max_chars: usize,
    retry: RetryPolicy,
}

impl HttpScrapeProvider {
    pub fn new(config: &ScrapeConfig, retry: RetryPolicy) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            max_chars: config.max_chars,
            retry,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ProviderError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("fetch of {url} failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited { retry_after_secs: None });
        }
        if status.is_server_error() {
            return Err(ProviderError::Unreachable(format!("{url} returned {status}")));
        }
        if !status.is_success() {
            return Err(ProviderError::InvalidResponse(format!("{url} returned {status}")));
        }

        let is_html = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_none_or(|v| v.contains("html"));

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("unreadable body from {url}: {e}")))?;

        let text = if is_html {
            htmd::convert(&body).map_err(|e| ProviderError::InvalidResponse(format!("HTML conversion failed: {e}")))?
        } else {
            body
        };

        Ok(truncate_chars(text.trim(), self.max_chars))
    }
}

/// Keep at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[async_trait]
impl ScrapeProvider for HttpScrapeProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn scrape(&self, url: &str) -> Result<String, ProviderError> {
        tracing::debug!(url, "fetching page");
        self.retry.execute(|| self.fetch_once(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_is_boundary_safe() {
        assert_eq!(truncate_chars("привет", 3), "при...");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[tokio::test]
    async fn test_scrape_converts_html() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body><h1>Profile</h1><p>alice posts here</p></body></html>")
            .create_async()
            .await;

        let scraper = HttpScrapeProvider::new(&ScrapeConfig::default(), RetryPolicy::none()).unwrap();
        let text = scraper.scrape(&format!("{}/page", server.url())).await.unwrap();

        assert!(text.contains("Profile"));
        assert!(text.contains("alice posts here"));
        assert!(!text.contains("<p>"));
    }

    #[tokio::test]
    async fn test_not_found_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/gone").with_status(404).create_async().await;

        let scraper = HttpScrapeProvider::new(&ScrapeConfig::default(), RetryPolicy::none()).unwrap();
        let err = scraper.scrape(&format!("{}/gone", server.url())).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
