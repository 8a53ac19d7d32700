//! Error types for the search providers.

use thiserror::Error;

/// Errors that can occur while querying a search provider
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport failure: DNS, connection, timeout, body read
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Search API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Failed to parse search response: {0}")]
    Parse(String),

    /// The API answered 200 but reported errors in the payload
    #[error("Search API reported an error: {0}")]
    Api(String),
}
