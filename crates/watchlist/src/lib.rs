//! Watchlist persistence and the watchlist page.
//!
//! The watchlist is an ordered list of saved records stored as one JSON array
//! in the origin's key-value store. The page controller renders it as cards
//! with removal controls, or an empty-state view when nothing is saved.

pub mod page;
pub mod persistence;

pub use page::{render_cards, render_empty_state, WatchlistPage};
pub use persistence::{AddOutcome, Watchlist};
