//! Single-threaded event loop around a [`Controller`].

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{spawn_local, LocalSet};
use tracing::debug;

use crate::controller::{SearchTicket, SuggestTicket};
use crate::debounce::Debouncer;
use crate::pagination::ControlKind;
use crate::suggestion::Key;
use crate::{Controller, Result, ResultPayload, SearchBackend};

/// Something that happened on the page.
#[derive(Debug)]
pub enum Event {
    /// The input text changed.
    Input(String),
    /// A key was pressed in the input.
    Key(Key),
    /// The search form was submitted.
    SubmitForm,
    /// A suggestion entry was clicked.
    PickSuggestion(usize),
    /// The correction banner was clicked.
    ClickCorrection,
    /// The pagination control at this index was clicked.
    ClickPage(usize),
    /// The first pagination control of this kind (and target page, for
    /// numbered controls) was clicked.
    ClickControl(ControlKind, Option<u32>),
    /// A pointer press landed outside the form and the suggestion list.
    ClickOutside,
    /// The input has been quiet for the debounce period. Carries the commit
    /// generation current when the keystroke was scheduled.
    Debounced { generation: u64, text: String },
    /// An autocomplete request finished.
    SuggestionsReady(SuggestTicket, Result<Vec<String>>),
    /// A search request finished.
    SearchReady(SearchTicket, Result<ResultPayload>),
    /// Stop the loop.
    Shutdown,
}

/// Owns a controller and feeds it events in order.
///
/// Network calls run as local tasks and report back through the same channel,
/// so every state change happens on the loop's thread between awaits. Must be
/// driven inside a [`LocalSet`]; [`Session::run`] sets one up.
pub struct Session<B> {
    controller: Controller<B>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    debouncer: Debouncer<(u64, String)>,
    /// Bumped by every committed search; older debounced keystrokes are dropped.
    generation: u64,
}

impl<B: SearchBackend + 'static> Session<B> {
    /// Wraps `controller`, debouncing input by its configured delay.
    pub fn new(controller: Controller<B>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let delay = Duration::from_millis(controller.config().debounce_ms);
        let debounce_tx = tx.clone();
        let debouncer = Debouncer::new(delay, move |(generation, text): (u64, String)| {
            let _ = debounce_tx.send(Event::Debounced { generation, text });
        });
        Self {
            controller,
            tx,
            rx,
            debouncer,
            generation: 0,
        }
    }

    /// Returns a sender for posting events.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Returns the controller.
    pub fn controller(&self) -> &Controller<B> {
        &self.controller
    }

    /// Waits for the next event.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Applies one event. Returns whether anything visible may have changed.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Input(text) => {
                self.controller.set_input(text.clone());
                self.debouncer.call((self.generation, text));
                true
            }
            Event::Debounced { generation, text } => {
                if generation != self.generation {
                    debug!("Dropping debounced input {:?} from before a search", text);
                    return false;
                }
                let was_open = self.controller.suggestions().is_open();
                match self.controller.begin_suggestions(&text) {
                    Some(ticket) => {
                        self.spawn_autocomplete(ticket);
                        false
                    }
                    None => was_open,
                }
            }
            Event::Key(key) => {
                let action = self.controller.press_key(key);
                if let Some(ticket) = action.search {
                    self.spawn_search(ticket);
                }
                action.outcome.prevents_default() || key == Key::Enter
            }
            Event::SubmitForm => {
                let ticket = self.controller.submit_form();
                self.spawn_search_opt(ticket)
            }
            Event::PickSuggestion(index) => {
                let ticket = self.controller.pick_suggestion(index);
                self.spawn_search_opt(ticket)
            }
            Event::ClickCorrection => {
                let ticket = self.controller.click_correction();
                self.spawn_search_opt(ticket)
            }
            Event::ClickPage(index) => {
                let ticket = self.controller.click_page_control(index);
                self.spawn_search_opt(ticket)
            }
            Event::ClickControl(kind, page) => {
                let index = self.controller.view().find_control(kind, page);
                let ticket = index.and_then(|index| self.controller.click_page_control(index));
                self.spawn_search_opt(ticket)
            }
            Event::ClickOutside => {
                let was_open = self.controller.suggestions().is_open();
                self.controller.click_outside();
                was_open
            }
            Event::SuggestionsReady(ticket, result) => {
                self.controller.finish_suggestions(ticket, result)
            }
            Event::SearchReady(ticket, result) => self.controller.finish_search(ticket, result),
            Event::Shutdown => false,
        }
    }

    /// Runs until [`Event::Shutdown`], calling `on_change` after each visible
    /// change. Returns the controller.
    pub async fn run<F>(mut self, mut on_change: F) -> Controller<B>
    where
        F: FnMut(&Controller<B>),
    {
        let local = LocalSet::new();
        local
            .run_until(async move {
                while let Some(event) = self.rx.recv().await {
                    if matches!(event, Event::Shutdown) {
                        debug!("Session shutting down");
                        break;
                    }
                    if self.handle(event) {
                        on_change(&self.controller);
                    }
                }
                self.debouncer.cancel();
                self.controller
            })
            .await
    }

    fn spawn_search_opt(&mut self, ticket: Option<SearchTicket>) -> bool {
        match ticket {
            Some(ticket) => {
                self.spawn_search(ticket);
                true
            }
            None => false,
        }
    }

    fn spawn_search(&mut self, ticket: SearchTicket) {
        // A committed search supersedes keystrokes still waiting to autocomplete,
        // including ones whose timer already fired into the channel.
        self.debouncer.cancel();
        self.generation += 1;
        let backend = self.controller.backend();
        let tx = self.tx.clone();
        spawn_local(async move {
            let result = backend.search(&ticket.request).await;
            let _ = tx.send(Event::SearchReady(ticket, result));
        });
    }

    fn spawn_autocomplete(&self, ticket: SuggestTicket) {
        let backend = self.controller.backend();
        let tx = self.tx.clone();
        spawn_local(async move {
            let result = backend.autocomplete(&ticket.request).await;
            let _ = tx.send(Event::SuggestionsReady(ticket, result));
        });
    }
}
