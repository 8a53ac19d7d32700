//! Watchlist page controller and renderer.
//!
//! Every interaction re-reads the persisted list and renders it in full, so
//! the `data-index` attributes on screen always match the stored order.

use crate::persistence::Watchlist;
use anyhow::Result;
use shared::html::{document, escape};
use shared::{KeyValueStore, Modal, ModalEvent, RecordView, SelectedRecord, WatchlistEntry};
use std::fmt::Write;
use tracing::debug;

/// Caption shown on the empty-state illustration
pub const EMPTY_CAPTION: &str = "No saved anime!";

/// Call-to-action linking back to the search page
pub const EMPTY_CALL_TO_ACTION: &str = "Save anime to watch dattebayo!!!";

/// Render saved entries as cards with removal controls
pub fn render_cards(list: &[WatchlistEntry]) -> String {
    let mut html = String::new();

    for (index, entry) in list.iter().enumerate() {
        let title = escape(entry.title());
        let _ = writeln!(html, "<div class=\"result-card\" data-index=\"{index}\">");
        let _ = writeln!(html, "  <div class=\"result-image-wrapper\">");
        let _ = writeln!(
            html,
            "    <img src=\"{}\" class=\"result-image\" alt=\"{title}\">",
            escape(entry.image_url())
        );
        let _ = writeln!(html, "  </div>");
        let _ = writeln!(html, "  <div class=\"result-title\">{title}</div>");
        let _ = writeln!(html, "  <div class=\"modal-info\">{}</div>", escape(&entry.info_line()));
        let _ = writeln!(
            html,
            "  <button class=\"modal-favorite-btn remove-btn\" data-index=\"{index}\">Remove</button>"
        );
        let _ = writeln!(html, "</div>");
    }

    html
}

/// Empty-state view shown instead of an empty grid
pub fn render_empty_state() -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"watchlist-empty-wrapper\">");
    let _ = writeln!(html, "  <video class=\"empty-video\" autoplay loop muted playsinline>");
    let _ = writeln!(html, "    <source src=\"img/tears.mp4\" type=\"video/mp4\">");
    let _ = writeln!(html, "  </video>");
    let _ = writeln!(
        html,
        "  <a href=\"{}\" class=\"watchlist-link watchlist-start-btn\">{}</a>",
        shared::paths::SEARCH_PAGE,
        escape(EMPTY_CALL_TO_ACTION)
    );
    let _ = writeln!(html, "</div>");
    html
}

/// Controller for the watchlist page
pub struct WatchlistPage<S: KeyValueStore> {
    watchlist: Watchlist<S>,
    modal: Modal,
    /// Current contents of the `#watchlist` container
    container: String,
    is_empty: bool,
}

impl<S: KeyValueStore> WatchlistPage<S> {
    /// Create the page and perform the initial render
    pub fn new(watchlist: Watchlist<S>) -> Self {
        let mut page = Self {
            watchlist,
            modal: Modal::without_save_control(),
            container: String::new(),
            is_empty: true,
        };
        page.render();
        page
    }

    /// Re-read the persisted list and re-render the container
    pub fn render(&mut self) -> &str {
        let list = self.watchlist.load();
        self.is_empty = list.is_empty();
        self.container = if self.is_empty {
            render_empty_state()
        } else {
            render_cards(&list)
        };

        debug!(entries = list.len(), "Rendered watchlist");
        &self.container
    }

    /// Remove the entry at `index` and fully re-render
    pub fn remove(&mut self, index: usize) -> Result<Option<WatchlistEntry>> {
        let removed = self.watchlist.remove_at(index)?;
        self.render();
        Ok(removed)
    }

    /// Open the modal for the entry at `index`, returning whether one existed
    pub fn open(&mut self, index: usize) -> Result<bool> {
        match self.watchlist.get(index)? {
            Some(entry) => {
                self.modal.open(SelectedRecord::Saved(entry));
                Ok(true)
            }
            None => {
                debug!(index = index, "No watchlist entry at index");
                Ok(false)
            }
        }
    }

    /// Route a close trigger to the modal
    pub fn handle_modal(&mut self, event: &ModalEvent) -> bool {
        self.modal.handle(event)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn watchlist(&self) -> &Watchlist<S> {
        &self.watchlist
    }

    /// The complete watchlist document
    pub fn document(&self) -> String {
        let (grid_class, caption) = if self.is_empty {
            ("", EMPTY_CAPTION)
        } else {
            (" class=\"watchlist-grid\"", "")
        };

        let mut body = String::new();
        let _ = writeln!(body, "<header class=\"watchlist-header\">");
        let _ = writeln!(body, "  <h1>My Watchlist</h1>");
        let _ = writeln!(body, "  <p class=\"watchlist-subtitle\"></p>");
        let _ = writeln!(
            body,
            "  <a href=\"{}\" class=\"watchlist-link\">Back to search</a>",
            shared::paths::SEARCH_PAGE
        );
        let _ = writeln!(body, "</header>");
        let _ = writeln!(body, "<svg class=\"curved-text\" viewBox=\"0 0 300 300\">");
        let _ = writeln!(body, "  <path id=\"curve\" d=\"M 50 150 A 100 100 0 0 1 250 150\" fill=\"none\"/>");
        let _ = writeln!(
            body,
            "  <text class=\"curved-no-saved\"><textPath href=\"#curve\">{}</textPath></text>",
            escape(caption)
        );
        let _ = writeln!(body, "</svg>");
        let _ = writeln!(body, "<div id=\"watchlist\"{grid_class}>");
        body.push_str(&self.container);
        let _ = writeln!(body, "</div>");
        body.push_str(&self.modal.render());

        document("My Watchlist", &body)
    }
}
