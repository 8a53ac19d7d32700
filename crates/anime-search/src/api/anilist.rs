//! AniList GraphQL client.
//!
//! Every request is a POST of `{query, variables}` to one endpoint; records
//! come back under `data.Page.media`.

use super::rate_limiter::RateLimiter;
use super::types::{GenreCollectionData, GraphQlResponse, PageData};
use super::{SearchProvider, SearchQuery};
use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::config::SearchConfig;
use shared::SearchResult;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const MEDIA_SEARCH: &str = "
query ($search: String, $perPage: Int) {
  Page(perPage: $perPage) {
    media(search: $search, type: ANIME, sort: [SEARCH_MATCH, POPULARITY_DESC]) {
      id
      title { romaji english native }
      format
      episodes
      averageScore
      coverImage { large medium }
      description
      genres
    }
  }
}";

const MEDIA_POPULAR: &str = "
query ($perPage: Int) {
  Page(perPage: $perPage) {
    media(type: ANIME, sort: [POPULARITY_DESC]) {
      id
      title { romaji english native }
      format
      episodes
      averageScore
      coverImage { large medium }
      description
      genres
    }
  }
}";

const GENRE_COLLECTION: &str = "query { GenreCollection }";

/// AniList GraphQL client
pub struct AniListClient {
    client: Client,
    endpoint: String,
    rate_limiter: Mutex<RateLimiter>,
}

impl AniListClient {
    /// Create a new AniList client
    pub fn new(
        endpoint: impl Into<String>,
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
            endpoint: endpoint.into(),
            rate_limiter: Mutex::new(RateLimiter::new(requests_per_second, requests_per_minute)),
        })
    }

    /// Create a client from the search configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::new(
            config.anilist_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            config.rate_limit.requests_per_second,
            config.rate_limit.requests_per_minute,
        )
    }

    /// POST a GraphQL document and decode `data`
    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, SearchError> {
        self.rate_limiter.lock().await.acquire().await;

        debug!(endpoint = %self.endpoint, variables = %variables, "Making GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: Result<GraphQlResponse<T>, _> = serde_json::from_str(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.errors.into_iter().next())
                .map(|e| e.message)
                .unwrap_or_else(|| body.chars().take(200).collect());

            warn!(endpoint = %self.endpoint, status = %status, error = %message, "Request failed");
            return Err(SearchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.map_err(|e| {
            warn!(endpoint = %self.endpoint, error = %e, "Failed to parse response");
            SearchError::Parse(e.to_string())
        })?;

        if let Some(error) = parsed.errors.into_iter().next() {
            warn!(endpoint = %self.endpoint, error = %error.message, "GraphQL error");
            return Err(SearchError::Api(error.message));
        }

        parsed
            .data
            .ok_or_else(|| SearchError::Parse("response has no data".to_string()))
    }
}

#[async_trait]
impl SearchProvider for AniListClient {
    fn name(&self) -> &'static str {
        "anilist"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        info!(query = %query.text, limit = query.limit, "Searching AniList");

        // Category-only searches carry no text; list the most popular titles.
        let data: PageData = if query.text.is_empty() {
            self.execute(MEDIA_POPULAR, json!({ "perPage": query.limit }))
                .await?
        } else {
            self.execute(
                MEDIA_SEARCH,
                json!({ "search": query.text, "perPage": query.limit }),
            )
            .await?
        };

        Ok(data.page.media.into_iter().map(SearchResult::from).collect())
    }

    async fn categories(&self) -> Result<Vec<String>, SearchError> {
        info!("Fetching genre collection");
        let data: GenreCollectionData = self.execute(GENRE_COLLECTION, json!({})).await?;
        Ok(data.genres)
    }
}
