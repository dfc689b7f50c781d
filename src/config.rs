//! Controller configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Locale, Result};

/// Which full-search endpoint the query session calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEndpoint {
    /// `/search`: flat results plus spelling suggestions.
    #[default]
    Search,
    /// `/correction`: raw hits with an embedded correction.
    Correction,
}

impl SearchEndpoint {
    /// Returns the request path for this endpoint.
    pub fn path(self) -> &'static str {
        match self {
            SearchEndpoint::Search => "/search",
            SearchEndpoint::Correction => "/correction",
        }
    }
}

/// How out-of-order responses are reconciled with the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only the response to the most recently issued request is applied.
    #[default]
    LatestWins,
    /// Every response is applied as it arrives; a slow stale response may
    /// overwrite a fresher one.
    Arrival,
}

/// Configuration for a search-box controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Origin of the autocomplete/search/correction endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Results per page for full searches.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Number of completions requested per autocomplete call.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u32,
    /// Quiet period before a keystroke triggers autocomplete.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum trimmed query length for autocomplete.
    #[serde(default = "default_min_suggest_chars")]
    pub min_suggest_chars: usize,
    /// Maximum number of numeric pagination controls.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Display locale.
    #[serde(default)]
    pub locale: Locale,
    /// Full-search endpoint variant.
    #[serde(default)]
    pub endpoint: SearchEndpoint,
    /// Response reconciliation policy.
    #[serde(default)]
    pub ordering: ResponseOrdering,
    /// Transport timeout in seconds; `None` keeps the client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_suggestion_limit() -> u32 {
    5
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_suggest_chars() -> usize {
    2
}

fn default_window_width() -> u32 {
    5
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            suggestion_limit: default_suggestion_limit(),
            debounce_ms: default_debounce_ms(),
            min_suggest_chars: default_min_suggest_chars(),
            window_width: default_window_width(),
            locale: Locale::default(),
            endpoint: SearchEndpoint::default(),
            ordering: ResponseOrdering::default(),
            timeout_secs: None,
        }
    }
}

impl ControllerConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::ControllerError::Other(format!(
                "Failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Sets the backend origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the display locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Sets the full-search endpoint variant.
    pub fn with_endpoint(mut self, endpoint: SearchEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Sets the response reconciliation policy.
    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}
