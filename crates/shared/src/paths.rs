//! File path utilities for the files the binaries write.
//!
//! Rendered pages, logs and the local storage file all live under one data
//! root; this module keeps their layout in one place.

use std::path::{Path, PathBuf};

/// File name of the rendered search page
pub const SEARCH_PAGE: &str = "index.html";

/// File name of the rendered watchlist page
pub const WATCHLIST_PAGE: &str = "watchlist.html";

/// File path manager for data files
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
    pages: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths with the given root and pages directories
    pub fn new(root: impl AsRef<Path>, pages: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            pages: pages.as_ref().to_path_buf(),
        }
    }

    /// Build the layout described by a loaded configuration
    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(config.data_dir(), config.pages_dir())
    }

    /// Get the root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the rendered pages directory
    pub fn pages_dir(&self) -> &Path {
        &self.pages
    }

    /// Get the rendered search page path
    pub fn search_page(&self) -> PathBuf {
        self.pages.join(SEARCH_PAGE)
    }

    /// Get the rendered watchlist page path
    pub fn watchlist_page(&self) -> PathBuf {
        self.pages.join(WATCHLIST_PAGE)
    }

    /// Create all necessary directories
    pub fn create_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.pages)?;
        Ok(())
    }

    /// Write a rendered page, creating the pages directory if needed
    pub fn write_page(&self, path: &Path, html: &str) -> anyhow::Result<()> {
        use anyhow::Context;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create pages directory: {}", parent.display()))?;
        }
        std::fs::write(path, html)
            .with_context(|| format!("Failed to write page: {}", path.display()))?;

        tracing::debug!(path = %path.display(), bytes = html.len(), "Page written");
        Ok(())
    }
}
