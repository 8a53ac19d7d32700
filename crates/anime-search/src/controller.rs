//! Search page controller.
//!
//! Owns the fetched result set, the selected category, the card map and the
//! detail modal. A search is split into `begin_search` and `finish_search` so
//! that responses can arrive out of order: each search takes a sequence
//! number and only the response for the latest one is applied.

use crate::api::{SearchProvider, SearchQuery};
use crate::error::SearchError;
use crate::filter::apply_filter;
use crate::render::{render_cards, search_page, SearchForm};
use shared::html::{placeholder_card, LOAD_ERROR, NO_RESULTS, SEARCHING};
use shared::{KeyValueStore, Modal, ModalEvent, RecordView, SearchResult, SelectedRecord};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, info, warn};
use watchlist::{AddOutcome, Watchlist};

/// Identifier carried by a rendered card
pub type CardId = usize;

/// User-visible message produced by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Search submitted with neither text nor category
    MissingQuery,
    /// Save pressed while no record is displayed
    NothingSelected,
    Added(String),
    AlreadySaved(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingQuery => write!(f, "Type a title or pick a vibe before searching."),
            Notice::NothingSelected => write!(f, "Open an anime card first."),
            Notice::Added(title) => write!(f, "\"{}\" was added to your watchlist.", title),
            Notice::AlreadySaved(title) => write!(f, "\"{}\" is already in your watchlist.", title),
        }
    }
}

/// Handle for one in-flight search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// How a finished search changed the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Cards rendered after filtering
    Rendered { fetched: usize, shown: usize },
    /// The provider returned nothing, or the filter removed everything
    NoResults,
    /// Transport or remote failure; the error placeholder is shown
    Failed,
    /// A newer search superseded this one; nothing changed
    Stale,
}

/// State of the search page
pub struct SearchController {
    /// Sequence number of the most recent search
    latest_seq: u64,
    pending: bool,
    query: String,
    category: Option<String>,
    results: Vec<SearchResult>,
    cards: BTreeMap<CardId, SearchResult>,
    /// Current contents of the `#results` container
    container: String,
    modal: Modal,
    page_size: u32,
}

impl SearchController {
    pub fn new(page_size: u32) -> Self {
        Self {
            latest_seq: 0,
            pending: false,
            query: String::new(),
            category: None,
            results: Vec::new(),
            cards: BTreeMap::new(),
            container: String::new(),
            modal: Modal::new(),
            page_size,
        }
    }

    /// Validate the inputs and start a search
    ///
    /// Shows the "searching" placeholder immediately and returns the ticket
    /// and query to hand to the provider.
    pub fn begin_search(
        &mut self,
        query_text: &str,
        category: Option<&str>,
    ) -> Result<(SearchTicket, SearchQuery), Notice> {
        let query = SearchQuery::new(query_text, self.page_size);
        let category = normalize_category(category);

        if query.text.is_empty() && category.is_none() {
            info!("Search blocked: no query and no category");
            return Err(Notice::MissingQuery);
        }

        self.latest_seq += 1;
        self.pending = true;
        self.query = query.text.clone();
        self.category = category;
        self.cards.clear();
        self.container = placeholder_card(SEARCHING);

        debug!(seq = self.latest_seq, query = %query.text, category = ?self.category, "Search started");
        Ok((SearchTicket { seq: self.latest_seq }, query))
    }

    /// Apply a provider response, unless a newer search has started since
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<SearchResult>, SearchError>,
    ) -> SearchOutcome {
        if ticket.seq != self.latest_seq {
            info!(seq = ticket.seq, latest = self.latest_seq, "Ignoring stale search response");
            return SearchOutcome::Stale;
        }
        self.pending = false;

        match outcome {
            Ok(results) if results.is_empty() => {
                info!(query = %self.query, "Search returned no results");
                self.results.clear();
                self.cards.clear();
                self.container = placeholder_card(NO_RESULTS);
                SearchOutcome::NoResults
            }
            Ok(results) => {
                let fetched = results.len();
                self.results = results;
                let shown = self.refresh();
                info!(query = %self.query, fetched = fetched, shown = shown, "Search complete");

                if shown == 0 {
                    SearchOutcome::NoResults
                } else {
                    SearchOutcome::Rendered { fetched, shown }
                }
            }
            Err(e) => {
                error!(query = %self.query, error = %e, "Search failed");
                self.cards.clear();
                self.container = placeholder_card(LOAD_ERROR);
                SearchOutcome::Failed
            }
        }
    }

    /// Run one search against a provider from start to finish
    pub async fn submit_search(
        &mut self,
        provider: &dyn SearchProvider,
        query_text: &str,
        category: Option<&str>,
    ) -> Result<SearchOutcome, Notice> {
        let (ticket, query) = self.begin_search(query_text, category)?;
        let response = provider.search(&query).await;
        Ok(self.finish_search(ticket, response))
    }

    /// Change the category and re-render the current result set
    pub fn set_category(&mut self, category: Option<&str>) -> usize {
        self.category = normalize_category(category);
        if self.pending {
            // The in-flight response will be filtered with the new category
            return 0;
        }
        self.refresh()
    }

    /// Rebuild the card map and container from the full result set
    fn refresh(&mut self) -> usize {
        let filtered = apply_filter(&self.results, self.category.as_deref());

        self.container = if filtered.is_empty() {
            placeholder_card(NO_RESULTS)
        } else {
            render_cards(&filtered)
        };
        self.cards = filtered.into_iter().enumerate().collect();

        self.cards.len()
    }

    /// Open the modal for a rendered card
    pub fn select_card(&mut self, card_id: CardId) -> bool {
        match self.cards.get(&card_id) {
            Some(record) => {
                self.modal.open(SelectedRecord::Search(record.clone()));
                true
            }
            None => {
                warn!(card_id = card_id, "No card with this id");
                false
            }
        }
    }

    /// Route a close trigger to the modal
    pub fn handle_modal(&mut self, event: &ModalEvent) -> bool {
        self.modal.handle(event)
    }

    /// Save the record displayed in the modal to the watchlist
    pub fn save_selected<S: KeyValueStore>(
        &self,
        watchlist: &mut Watchlist<S>,
    ) -> anyhow::Result<Notice> {
        let Some(record) = self.modal.selected() else {
            return Ok(Notice::NothingSelected);
        };

        let title = record.title().to_string();
        Ok(match watchlist.add(record.to_entry())? {
            AddOutcome::Added => Notice::Added(title),
            AddOutcome::AlreadySaved => Notice::AlreadySaved(title),
        })
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn cards(&self) -> &BTreeMap<CardId, SearchResult> {
        &self.cards
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// The complete search page document
    pub fn document(&self, categories: &[String]) -> String {
        search_page(
            SearchForm {
                query: &self.query,
                category: self.category.as_deref(),
                categories,
            },
            &self.container,
            &self.modal,
        )
    }
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
