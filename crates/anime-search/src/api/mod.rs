//! Search provider clients.
//!
//! Two interchangeable providers sit behind [`SearchProvider`]: Jikan (REST
//! with a query string) and AniList (a single GraphQL endpoint). Both are
//! rate-limited on the client side and map their records into `SearchResult`.

pub mod anilist;
pub mod jikan;
pub mod rate_limiter;
pub mod types;

pub use anilist::AniListClient;
pub use jikan::JikanClient;
pub use rate_limiter::RateLimiter;

use crate::error::SearchError;
use async_trait::async_trait;
use shared::config::{ProviderKind, SearchConfig};
use shared::SearchResult;
use std::sync::Arc;

/// What a single search asks the provider for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Trimmed free text, possibly empty
    pub text: String,
    /// Maximum number of records to return
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(text: &str, limit: u32) -> Self {
        Self {
            text: text.trim().to_string(),
            limit,
        }
    }
}

/// A remote anime metadata API
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Fetch one bounded page of records for a query
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError>;

    /// Category names the provider knows about
    async fn categories(&self) -> Result<Vec<String>, SearchError>;
}

/// Build the provider selected in the configuration
pub fn build_provider(config: &SearchConfig) -> Result<Arc<dyn SearchProvider>, SearchError> {
    let provider: Arc<dyn SearchProvider> = match config.provider {
        ProviderKind::Jikan => Arc::new(JikanClient::from_config(config)?),
        ProviderKind::Anilist => Arc::new(AniListClient::from_config(config)?),
    };
    Ok(provider)
}
