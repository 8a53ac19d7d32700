//! Watchlist persistence on top of a key-value store.
//!
//! Every operation reads the currently persisted list and writes the full list
//! back; there are no incremental writes and no in-memory copy that could
//! drift from the store.

use anyhow::{Context, Result};
use serde_json::Value;
use shared::{KeyValueStore, WatchlistEntry, WATCHLIST_KEY};
use tracing::{error, info, warn};

/// Result of trying to add a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An entry with the same title already exists; nothing was written
    AlreadySaved,
}

/// Persistent, ordered list of saved records
pub struct Watchlist<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Watchlist<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the persisted list for display
    ///
    /// Never fails: a store error is logged and reads as an empty list.
    /// Mutations read through [`Watchlist::try_load`].
    pub fn load(&self) -> Vec<WatchlistEntry> {
        self.try_load().unwrap_or_else(|e| {
            error!(error = %e, "Failed to read watchlist from storage");
            Vec::new()
        })
    }

    /// Read the persisted list, propagating store errors
    ///
    /// A missing key or content that is not a JSON array reads as empty.
    /// Individual entries that do not parse are skipped, the rest are kept.
    pub fn try_load(&self) -> Result<Vec<WatchlistEntry>> {
        let Some(raw) = self
            .store
            .get(WATCHLIST_KEY)
            .context("Failed to read watchlist")?
        else {
            return Ok(Vec::new());
        };

        let items = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Could not parse watchlist JSON, starting empty");
                return Ok(Vec::new());
            }
        };

        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(index = index, error = %e, "Skipping unreadable watchlist entry");
                    None
                }
            })
            .collect())
    }

    /// Serialize and overwrite the persisted list
    pub fn save(&mut self, list: &[WatchlistEntry]) -> Result<()> {
        let json = serde_json::to_string(list).context("Failed to serialize watchlist")?;
        self.store
            .set(WATCHLIST_KEY, &json)
            .context("Failed to persist watchlist")
    }

    /// Append a record unless its title is already saved
    pub fn add(&mut self, entry: WatchlistEntry) -> Result<AddOutcome> {
        let mut list = self.try_load()?;

        if list.iter().any(|item| item.title == entry.title) {
            info!(title = %entry.title, "Already in watchlist");
            return Ok(AddOutcome::AlreadySaved);
        }

        info!(title = %entry.title, position = list.len(), "Adding to watchlist");
        list.push(entry);
        self.save(&list)?;

        Ok(AddOutcome::Added)
    }

    /// Remove the entry at `index` of the persisted list
    ///
    /// Out-of-range indices leave the store untouched and return `None`.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<WatchlistEntry>> {
        let mut list = self.try_load()?;

        if index >= list.len() {
            warn!(index = index, len = list.len(), "Watchlist index out of range");
            return Ok(None);
        }

        let removed = list.remove(index);
        self.save(&list)?;

        info!(title = %removed.title, index = index, "Removed from watchlist");
        Ok(Some(removed))
    }

    /// Exact title match against every saved entry
    pub fn contains(&self, title: &str) -> bool {
        self.load().iter().any(|item| item.title == title)
    }

    /// Entry at `index` of the persisted list
    pub fn get(&self, index: usize) -> Result<Option<WatchlistEntry>> {
        Ok(self.try_load()?.into_iter().nth(index))
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
