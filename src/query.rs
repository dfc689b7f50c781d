//! Query state and request construction.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// The committed search: last submitted text and the page being shown.
///
/// Only a successful submission or a pagination click changes it; the page is
/// never advanced ahead of the request that displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    /// The submitted query text.
    pub text: String,
    /// Page number (1-indexed).
    pub page: u32,
    /// Results per page.
    pub page_size: u32,
}

impl QueryState {
    /// Creates an empty query state with the given page size.
    pub fn new(page_size: u32) -> Self {
        Self {
            text: String::new(),
            page: 1,
            page_size,
        }
    }

    /// Returns true once a query has been committed.
    pub fn is_committed(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Builds the request for the current state.
    pub fn request(&self) -> QueryRequest {
        QueryRequest::new(&self.text)
            .with_page(self.page)
            .with_size(self.page_size)
    }
}

/// Parameters of one GET against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Raw query text, encoded when the URL is built.
    pub q: String,
    /// Page number (1-indexed).
    pub page: u32,
    /// Page size.
    pub size: u32,
}

impl QueryRequest {
    /// Creates a request for the first page with a size of 10.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page: 1,
            size: 10,
        }
    }

    /// Sets the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Builds the full URL for `path` under `base_url`.
    pub fn url(&self, base_url: &str, path: &str) -> Result<Url> {
        let raw = format!(
            "{}{}?q={}&page={}&size={}",
            base_url.trim_end_matches('/'),
            path,
            urlencoding::encode(&self.q),
            self.page,
            self.size
        );
        Ok(Url::parse(&raw)?)
    }
}

/// Normalizes query text for comparison.
///
/// Folds Arabic letter variants to their Persian forms, turns zero-width and
/// bidi marks into spaces, collapses whitespace and lowercases.
pub fn normalize_query(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            'ي' => 'ی',
            'ك' => 'ک',
            '\u{200C}' | '\u{200F}' | '\u{202A}' | '\u{202B}' | '\u{00AC}' => ' ',
            other => other,
        })
        .collect();

    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
