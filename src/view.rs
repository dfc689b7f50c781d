//! Page regions the controller writes to.

use serde::{Deserialize, Serialize};

use crate::pagination::{ControlKind, PageControl};
use crate::render::{CorrectionBanner, RenderedResults, ResultsBody};

/// Contents of the status region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Empty,
    /// A search is in flight.
    Searching(String),
    /// The last search failed.
    Error(String),
    /// Hit count line, with an optional correction banner.
    Summary {
        line: String,
        correction: Option<CorrectionBanner>,
    },
}

/// Input, status, results and pagination regions of the search page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Text in the search input.
    pub input: String,
    pub status: Status,
    /// `None` when the results region is cleared.
    pub results: Option<ResultsBody>,
    pub pagination: Vec<PageControl>,
}

impl View {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears results and pagination and shows `message` as in progress.
    pub fn show_searching(&mut self, message: &str) {
        self.results = None;
        self.pagination.clear();
        self.status = Status::Searching(message.to_string());
    }

    /// Shows a search failure with the results region left empty.
    pub fn show_error(&mut self, message: &str) {
        self.results = None;
        self.pagination.clear();
        self.status = Status::Error(message.to_string());
    }

    /// Replaces every output region with a rendered result set.
    pub fn show_results(&mut self, rendered: RenderedResults) {
        self.status = Status::Summary {
            line: rendered.status,
            correction: rendered.correction,
        };
        self.results = Some(rendered.body);
        self.pagination = rendered.pagination;
    }

    /// Returns the correction banner currently shown.
    pub fn correction(&self) -> Option<&CorrectionBanner> {
        match &self.status {
            Status::Summary { correction, .. } => correction.as_ref(),
            _ => None,
        }
    }

    /// Finds a pagination control by kind; numbered controls also match on
    /// their target page.
    pub fn find_control(&self, kind: ControlKind, page: Option<u32>) -> Option<usize> {
        self.pagination.iter().position(|control| {
            control.kind == kind && page.map_or(true, |p| control.target == p)
        })
    }

    /// Returns the page marked active in the pagination controls.
    pub fn active_page(&self) -> Option<u32> {
        self.pagination
            .iter()
            .find(|control| control.active)
            .map(|control| control.target)
    }
}
