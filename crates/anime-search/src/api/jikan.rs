//! Jikan API v4 client with client-side rate limiting.

use super::rate_limiter::RateLimiter;
use super::types::{AnimeEntry, CategoryItem, DataResponse, JikanError};
use super::{SearchProvider, SearchQuery};
use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::config::SearchConfig;
use shared::SearchResult;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Jikan API v4 client
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: String,
    /// Rate limiter, shared by concurrent searches
    rate_limiter: Mutex<RateLimiter>,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        requests_per_second: f64,
        requests_per_minute: u32,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("anime-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Mutex::new(RateLimiter::new(requests_per_second, requests_per_minute)),
        })
    }

    /// Create a client from the search configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::new(
            config.jikan_base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            config.rate_limit.requests_per_second,
            config.rate_limit.requests_per_minute,
        )
    }

    /// Make a rate-limited GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, SearchError> {
        let url = format!("{}{}", self.base_url, endpoint);

        self.rate_limiter.lock().await.acquire().await;

        debug!(url = %url, params = ?params, "Making API request");

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<JikanError>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());

            warn!(url = %url, status = %status, error = %message, "Request failed");
            return Err(SearchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse response");
            SearchError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl SearchProvider for JikanClient {
    fn name(&self) -> &'static str {
        "jikan"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        info!(query = %query.text, limit = query.limit, "Searching Jikan");

        let mut params = vec![("limit", query.limit.to_string())];
        if !query.text.is_empty() {
            params.push(("q", query.text.clone()));
        }

        let response: DataResponse<AnimeEntry> = self.get("/anime", &params).await?;
        Ok(response.data.into_iter().map(SearchResult::from).collect())
    }

    async fn categories(&self) -> Result<Vec<String>, SearchError> {
        info!("Fetching anime genres");
        let response: DataResponse<CategoryItem> = self.get("/genres/anime", &[]).await?;
        Ok(response.data.into_iter().map(|g| g.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = JikanClient::new(
            "https://api.jikan.moe/v4/",
            Duration::from_secs(30),
            3.0,
            60,
        );
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url, "https://api.jikan.moe/v4");
    }
}
