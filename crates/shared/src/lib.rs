//! Shared library for the anime search & watchlist workspace.
//!
//! This crate provides common functionality used by both page controllers:
//! - Configuration management
//! - Logging infrastructure
//! - Record models (search results, watchlist entries)
//! - HTML escaping and the page shell
//! - The detail modal shared by both pages
//! - The origin-scoped key-value store
//! - File path utilities

pub mod config;
pub mod html;
pub mod logging;
pub mod modal;
pub mod models;
pub mod paths;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use modal::{ClickTarget, Modal, ModalEvent, ModalState};
pub use models::*;
pub use paths::DataPaths;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
