//! Transient autocomplete list and keyboard navigation.

use serde::{Deserialize, Serialize};

/// Keys the search input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    /// Any other key; never handled by the list.
    Other,
}

/// What the list did with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled; the input keeps its default behavior.
    Ignored,
    /// The highlight moved to this index.
    Highlighted(usize),
    /// Enter on a highlighted entry: commit this text as a search.
    Commit(String),
}

impl KeyOutcome {
    /// Whether the input's default key behavior is suppressed.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

/// The rendered suggestion list.
///
/// `selected` is `None` when nothing is highlighted; otherwise it is always a
/// valid index into `items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList {
    items: Vec<String>,
    selected: Option<usize>,
}

impl SuggestionList {
    /// Creates a closed list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entries and clears the highlight.
    pub fn replace(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected = None;
    }

    /// Empties the list. Calling it on a closed list does nothing.
    pub fn close(&mut self) {
        self.items.clear();
        self.selected = None;
    }

    /// Whether the list is showing anything.
    pub fn is_open(&self) -> bool {
        !self.items.is_empty()
    }

    /// Returns the entries.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Returns the highlighted index.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Returns the highlighted entry.
    pub fn selected_text(&self) -> Option<&str> {
        self.selected.and_then(|i| self.get(i))
    }

    /// Moves the highlight forward, wrapping to the first entry.
    pub fn select_next(&mut self) -> Option<usize> {
        let n = self.items.len();
        if n == 0 {
            return None;
        }
        let next = match self.selected {
            Some(i) => (i + 1) % n,
            None => 0,
        };
        self.selected = Some(next);
        Some(next)
    }

    /// Moves the highlight backward, wrapping to the last entry.
    pub fn select_previous(&mut self) -> Option<usize> {
        let n = self.items.len();
        if n == 0 {
            return None;
        }
        let prev = match self.selected {
            Some(i) => (i + n - 1) % n,
            None => n - 1,
        };
        self.selected = Some(prev);
        Some(prev)
    }

    /// Applies a key press. Only evaluated while the list is open.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::ArrowDown => self
                .select_next()
                .map_or(KeyOutcome::Ignored, KeyOutcome::Highlighted),
            Key::ArrowUp => self
                .select_previous()
                .map_or(KeyOutcome::Ignored, KeyOutcome::Highlighted),
            Key::Enter => match self.selected_text() {
                Some(text) => KeyOutcome::Commit(text.to_string()),
                None => KeyOutcome::Ignored,
            },
            Key::Other => KeyOutcome::Ignored,
        }
    }
}
