//! Anime search library.
//!
//! Queries a remote anime metadata API (Jikan REST or AniList GraphQL),
//! filters the fetched records by category and renders them as cards for the
//! search page, with a detail modal that can save records to the watchlist.

pub mod api;
pub mod controller;
pub mod error;
pub mod filter;
pub mod render;
pub mod repl;

pub use api::{build_provider, AniListClient, JikanClient, RateLimiter, SearchProvider, SearchQuery};
pub use controller::{CardId, Notice, SearchController, SearchOutcome, SearchTicket};
pub use error::SearchError;
pub use filter::apply_filter;
