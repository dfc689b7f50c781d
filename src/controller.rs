//! Search-box orchestration.
//!
//! [`Controller`] owns the committed query, the transient suggestion list and
//! the page regions. Every operation is split into a synchronous step that
//! updates state and hands out a ticket for the network call, and a
//! completion step that applies the response. The async methods run both
//! halves back to back; [`Session`](crate::Session) runs the network part as a
//! separate task so input keeps flowing while requests are in flight.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::render::ResultRenderer;
use crate::suggestion::{Key, KeyOutcome, SuggestionList};
use crate::view::View;
use crate::{
    ControllerConfig, QueryRequest, QueryState, ResponseOrdering, Result, ResultPayload,
    SearchBackend,
};

/// An issued autocomplete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestTicket {
    pub seq: u64,
    pub request: QueryRequest,
}

/// An issued search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub request: QueryRequest,
}

/// Result of a key press in the search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAction {
    pub outcome: KeyOutcome,
    /// Set when the key committed a search (highlighted Enter, or a plain
    /// Enter submitting the form).
    pub search: Option<SearchTicket>,
}

impl KeyAction {
    /// Whether the input's default key behavior was suppressed.
    pub fn prevents_default(&self) -> bool {
        self.outcome.prevents_default()
    }
}

/// The search-box controller, one per page.
pub struct Controller<B> {
    backend: Arc<B>,
    config: ControllerConfig,
    renderer: ResultRenderer,
    query: QueryState,
    suggestions: SuggestionList,
    view: View,
    suggest_seq: u64,
    search_seq: u64,
}

impl<B: SearchBackend> Controller<B> {
    /// Creates a controller over `backend`.
    pub fn new(backend: B, config: ControllerConfig) -> Self {
        Self::with_shared_backend(Arc::new(backend), config)
    }

    /// Creates a controller over an already shared backend.
    pub fn with_shared_backend(backend: Arc<B>, config: ControllerConfig) -> Self {
        let renderer = ResultRenderer::new(config.locale, config.page_size, config.window_width);
        Self {
            backend,
            query: QueryState::new(config.page_size),
            renderer,
            config,
            suggestions: SuggestionList::new(),
            view: View::new(),
            suggest_seq: 0,
            search_seq: 0,
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns the committed query.
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Returns the suggestion list.
    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    /// Returns the page regions.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Sets the text of the search input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.view.input = text.into();
    }

    // --- suggestion session ---

    /// Starts an autocomplete request for `text`.
    ///
    /// Below the minimum trimmed length the list is closed and no request is
    /// issued.
    pub fn begin_suggestions(&mut self, text: &str) -> Option<SuggestTicket> {
        if text.trim().chars().count() < self.config.min_suggest_chars {
            self.close_suggestions();
            return None;
        }
        self.suggest_seq += 1;
        let request = QueryRequest::new(text)
            .with_page(1)
            .with_size(self.config.suggestion_limit);
        debug!("Autocomplete #{} for {:?}", self.suggest_seq, text);
        Some(SuggestTicket {
            seq: self.suggest_seq,
            request,
        })
    }

    /// Applies an autocomplete response. Failures are logged and leave the
    /// current list as it is. Returns whether the list was replaced.
    pub fn finish_suggestions(
        &mut self,
        ticket: SuggestTicket,
        result: Result<Vec<String>>,
    ) -> bool {
        if self.is_stale(ticket.seq, self.suggest_seq) {
            warn!(
                "Discarding stale autocomplete #{} (latest #{})",
                ticket.seq, self.suggest_seq
            );
            return false;
        }
        match result {
            Ok(items) => {
                debug!("Autocomplete #{} returned {} items", ticket.seq, items.len());
                self.render_suggestions(items);
                true
            }
            Err(e) => {
                warn!("Autocomplete failed for {:?}: {}", ticket.request.q, e);
                false
            }
        }
    }

    /// Replaces the visible list; an empty list closes it.
    pub fn render_suggestions(&mut self, items: Vec<String>) {
        if items.is_empty() {
            self.close_suggestions();
        } else {
            self.suggestions.replace(items);
        }
    }

    /// Closes the list. Autocomplete responses still in flight no longer
    /// count as latest.
    pub fn close_suggestions(&mut self) {
        self.suggestions.close();
        self.suggest_seq += 1;
    }

    /// A pointer press outside the form and the suggestion list.
    pub fn click_outside(&mut self) {
        if self.suggestions.is_open() {
            debug!("Closing suggestions on outside click");
        }
        self.close_suggestions();
    }

    /// Handles a key press in the search input.
    pub fn press_key(&mut self, key: Key) -> KeyAction {
        let outcome = self.suggestions.handle_key(key);
        let search = match &outcome {
            KeyOutcome::Commit(text) => {
                let text = text.clone();
                self.view.input = text.clone();
                self.close_suggestions();
                self.begin_search(&text, 1)
            }
            KeyOutcome::Ignored if key == Key::Enter => self.submit_form(),
            _ => None,
        };
        KeyAction { outcome, search }
    }

    /// Activates the suggestion at `index`: fills the input and commits it.
    pub fn pick_suggestion(&mut self, index: usize) -> Option<SearchTicket> {
        let text = self.suggestions.get(index)?.to_string();
        self.view.input = text.clone();
        self.close_suggestions();
        self.begin_search(&text, 1)
    }

    // --- query session ---

    /// Starts a search for `text` at `page`.
    ///
    /// Blank text is ignored. Otherwise the suggestion list is closed, the
    /// results are cleared, the status shows the searching message and the
    /// query state is committed before the request goes out.
    pub fn begin_search(&mut self, text: &str, page: u32) -> Option<SearchTicket> {
        if text.trim().is_empty() {
            return None;
        }
        let page = page.max(1);

        self.close_suggestions();
        self.view
            .show_searching(self.config.locale.messages().searching);
        self.query = QueryState {
            text: text.to_string(),
            page,
            page_size: self.config.page_size,
        };
        self.search_seq += 1;
        debug!("Search #{} for {:?} page {}", self.search_seq, text, page);

        Some(SearchTicket {
            seq: self.search_seq,
            request: self.query.request(),
        })
    }

    /// Applies a search response. Returns whether the view changed.
    pub fn finish_search(&mut self, ticket: SearchTicket, result: Result<ResultPayload>) -> bool {
        if self.is_stale(ticket.seq, self.search_seq) {
            warn!(
                "Discarding stale search #{} (latest #{})",
                ticket.seq, self.search_seq
            );
            return false;
        }
        match result {
            Ok(payload) => {
                debug!(
                    "Search #{} returned {} of {} hits",
                    ticket.seq,
                    payload.hits.len(),
                    payload.total_hits
                );
                let rendered = self
                    .renderer
                    .render(&payload, &self.view.input, self.query.page);
                self.view.show_results(rendered);
            }
            Err(e) => {
                warn!("Search failed for {:?}: {}", ticket.request.q, e);
                self.view
                    .show_error(self.config.locale.messages().search_failed);
            }
        }
        true
    }

    /// Form submission: searches the input text from page 1.
    pub fn submit_form(&mut self) -> Option<SearchTicket> {
        let text = self.view.input.clone();
        self.begin_search(&text, 1)
    }

    /// Clicks the correction banner: the corrected text replaces the input
    /// and is searched from page 1.
    pub fn click_correction(&mut self) -> Option<SearchTicket> {
        let text = self.view.correction()?.text.clone();
        self.view.input = text.clone();
        self.begin_search(&text, 1)
    }

    /// Clicks the pagination control at `index`. Disabled controls and the
    /// current page do nothing.
    pub fn click_page_control(&mut self, index: usize) -> Option<SearchTicket> {
        let control = self.view.pagination.get(index)?;
        if !control.is_actionable(self.query.page) {
            return None;
        }
        let target = control.target;
        let text = self.query.text.clone();
        self.begin_search(&text, target)
    }

    fn is_stale(&self, seq: u64, latest: u64) -> bool {
        self.config.ordering == ResponseOrdering::LatestWins && seq != latest
    }

    // --- async conveniences ---

    /// Fetches and renders suggestions for `text`.
    pub async fn request_suggestions(&mut self, text: &str) {
        if let Some(ticket) = self.begin_suggestions(text) {
            let result = self.backend.autocomplete(&ticket.request).await;
            self.finish_suggestions(ticket, result);
        }
    }

    /// Searches `text` at `page` and renders the outcome.
    pub async fn submit(&mut self, text: &str, page: u32) {
        if let Some(ticket) = self.begin_search(text, page) {
            self.run_search(ticket).await;
        }
    }

    /// Handles a key press, running any search it commits.
    pub async fn key_down(&mut self, key: Key) -> KeyAction {
        let action = self.press_key(key);
        if let Some(ticket) = action.search.clone() {
            self.run_search(ticket).await;
        }
        action
    }

    /// Picks a suggestion and runs the search.
    pub async fn choose_suggestion(&mut self, index: usize) {
        if let Some(ticket) = self.pick_suggestion(index) {
            self.run_search(ticket).await;
        }
    }

    /// Clicks the correction banner and runs the search.
    pub async fn accept_correction(&mut self) {
        if let Some(ticket) = self.click_correction() {
            self.run_search(ticket).await;
        }
    }

    /// Clicks a pagination control and runs the search.
    pub async fn go_to_control(&mut self, index: usize) {
        if let Some(ticket) = self.click_page_control(index) {
            self.run_search(ticket).await;
        }
    }

    /// Runs an issued search to completion.
    pub async fn run_search(&mut self, ticket: SearchTicket) {
        let result = self.backend.search(&ticket.request).await;
        self.finish_search(ticket, result);
    }
}
