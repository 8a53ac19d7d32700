//! Detail modal shared by the search and watchlist pages.
//!
//! The modal is a two-state machine: `Closed` and `Open(record)`. Opening
//! while already open replaces the record. Three triggers close it: the close
//! control, a click that lands on the overlay itself, and Escape while visible.

use crate::html::escape;
use crate::models::{RecordView, SelectedRecord};
use std::fmt::Write;
use tracing::debug;

/// Modal visibility and the record it displays
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(SelectedRecord),
}

/// Where a click inside the modal container landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The background overlay itself
    Overlay,
    /// Anything inside the content box
    Content,
}

/// User interaction routed to the modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    CloseButton,
    Click(ClickTarget),
    /// Key name as reported by the page, e.g. `"Escape"`
    KeyPress(String),
}

/// The detail modal
#[derive(Debug, Clone)]
pub struct Modal {
    state: ModalState,
    /// Whether the "add to watchlist" control is rendered
    save_control: bool,
}

impl Default for Modal {
    fn default() -> Self {
        Self::new()
    }
}

impl Modal {
    /// Modal with the save control, as used on the search page
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            save_control: true,
        }
    }

    /// Modal without the save control, as used on the watchlist page
    pub fn without_save_control() -> Self {
        Self {
            state: ModalState::Closed,
            save_control: false,
        }
    }

    /// Show a record, replacing whatever was displayed
    pub fn open(&mut self, record: SelectedRecord) {
        debug!(title = %record.title(), "Opening modal");
        self.state = ModalState::Open(record);
    }

    pub fn close(&mut self) {
        if self.is_open() {
            debug!("Closing modal");
        }
        self.state = ModalState::Closed;
    }

    /// Route an interaction to the modal, returning whether it closed
    pub fn handle(&mut self, event: &ModalEvent) -> bool {
        if !self.is_open() {
            return false;
        }

        let closes = match event {
            ModalEvent::CloseButton => true,
            ModalEvent::Click(ClickTarget::Overlay) => true,
            ModalEvent::Click(ClickTarget::Content) => false,
            ModalEvent::KeyPress(key) => key == "Escape",
        };

        if closes {
            self.close();
        }
        closes
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    /// The record the save action operates on, if the modal is visible
    pub fn selected(&self) -> Option<&SelectedRecord> {
        match &self.state {
            ModalState::Open(record) => Some(record),
            ModalState::Closed => None,
        }
    }

    /// Render the modal markup with its fixed element ids
    pub fn render(&self) -> String {
        let (class, image, title, info, synopsis) = match &self.state {
            ModalState::Open(record) => (
                "modal is-open",
                escape(record.image_url()),
                escape(record.title()),
                escape(&record.info_line()),
                escape(record.synopsis_label()),
            ),
            ModalState::Closed => ("modal", String::new(), String::new(), String::new(), String::new()),
        };

        let mut html = String::new();
        let _ = writeln!(html, "<div id=\"mangaModal\" class=\"{class}\">");
        let _ = writeln!(html, "  <div class=\"modal-content\">");
        let _ = writeln!(html, "    <button id=\"modalClose\" class=\"modal-close\">&times;</button>");
        let _ = writeln!(html, "    <img id=\"modalImage\" class=\"modal-image\" src=\"{image}\" alt=\"{title}\">");
        let _ = writeln!(html, "    <h2 id=\"modalTitle\" class=\"modal-title\">{title}</h2>");
        let _ = writeln!(html, "    <p id=\"modalInfo\" class=\"modal-info\">{info}</p>");
        let _ = writeln!(html, "    <p id=\"modalSynopsis\" class=\"modal-synopsis\">{synopsis}</p>");
        if self.save_control {
            let _ = writeln!(html, "    <button id=\"favoriteButton\" class=\"modal-favorite-btn\">Add to Watchlist</button>");
        }
        let _ = writeln!(html, "  </div>");
        let _ = writeln!(html, "</div>");
        html
    }
}
