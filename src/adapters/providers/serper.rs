//! Serper.dev web search provider.
//!
//! POSTs `{"q", "num", "gl", "hl"}` to the search endpoint with the
//! `X-API-KEY` header and maps the `organic` results to [`SearchHit`]s.

use std::time::Duration;

use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::retry::{rate_limiter, RetryPolicy};
use crate::domain::errors::ProviderError;
use crate::domain::models::{SearchConfig, SearchHit, SearchOptions};
use crate::domain::ports::SearchProvider;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    gl: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hl: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperSearchProvider {
    http: Client,
    endpoint: String,
    api_key: String,
    limiter: DefaultDirectRateLimiter,
    retry: RetryPolicy,
}

impl SerperSearchProvider {
    pub fn new(config: &SearchConfig, api_key: impl Into<String>, retry: RetryPolicy) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            limiter: rate_limiter(config.requests_per_second),
            retry,
        })
    }

    async fn search_once(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>, ProviderError> {
        self.limiter.until_ready().await;

        let body = SearchRequest {
            q: query,
            num: options.limit,
            gl: options.country.as_deref(),
            hl: options.locale.as_deref(),
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("search request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(ProviderError::RateLimited { retry_after_secs });
        }
        if status.is_server_error() {
            return Err(ProviderError::Unreachable(format!("search endpoint returned {status}")));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::InvalidResponse(format!("search endpoint returned {status}: {text}")));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("search response parse failed: {e}")))?;

        Ok(parsed
            .organic
            .into_iter()
            .filter(|r| !r.link.is_empty())
            .take(options.limit)
            .map(|r| SearchHit::new(r.title, r.snippet, r.link))
            .collect())
    }
}

#[async_trait]
impl SearchProvider for SerperSearchProvider {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>, ProviderError> {
        tracing::debug!(query, limit = options.limit, "web search");
        self.retry.execute(|| self.search_once(query, options)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(endpoint: String, retry: RetryPolicy) -> SerperSearchProvider {
        let config = SearchConfig {
            endpoint,
            requests_per_second: 100,
            timeout_secs: 5,
            ..Default::default()
        };
        SerperSearchProvider::new(&config, "test-key", retry).unwrap()
    }

    #[tokio::test]
    async fn test_search_maps_organic_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("x-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "q": "alice darknet",
                "num": 2,
                "gl": "ru"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"organic":[
                    {"title":"A","link":"https://a.example","snippet":"first"},
                    {"title":"B","link":"https://b.example","snippet":"second"},
                    {"title":"C","link":"https://c.example","snippet":"third"}
                ]}"#,
            )
            .create_async()
            .await;

        let search = provider(format!("{}/search", server.url()), RetryPolicy::none());
        let options = SearchOptions {
            limit: 2,
            country: Some("ru".to_string()),
            locale: None,
        };
        let hits = search.search("alice darknet", &options).await.unwrap();

        mock.assert_async().await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], SearchHit::new("A", "first", "https://a.example"));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let search = provider(format!("{}/search", server.url()), RetryPolicy::none());
        let err = search.search("q", &SearchOptions::default()).await.unwrap_err();
        assert_eq!(err, ProviderError::RateLimited { retry_after_secs: Some(7) });
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let search = provider(format!("{}/search", server.url()), RetryPolicy::new(3, 1, 2));
        let err = search.search("q", &SearchOptions::default()).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", "/search")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let search = provider(format!("{}/search", server.url()), RetryPolicy::new(2, 1, 2));
        let err = search.search("q", &SearchOptions::default()).await.unwrap_err();

        failing.assert_async().await;
        assert!(matches!(err, ProviderError::Unreachable(_)));
    }
}
