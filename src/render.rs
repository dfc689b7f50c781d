//! Result rendering.
//!
//! A pure mapping from a normalized [`ResultPayload`] plus the text currently
//! in the input to what the page shows: status line, correction banner,
//! result cards (or a placeholder) and pagination controls.

use serde::{Deserialize, Serialize};

use crate::pagination::{build_controls, PageControl};
use crate::query::normalize_query;
use crate::{Hit, Locale, ResultPayload};

/// Link target used when a hit has no URL.
const PLACEHOLDER_URL: &str = "#";

/// One rendered hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCard {
    pub title: String,
    /// Link target; `#` when the hit had no URL.
    pub href: String,
    /// Display line for the URL, suppressed for placeholder URLs.
    pub display_url: Option<String>,
    /// Score formatted to two decimals.
    pub score: Option<String>,
    pub snippet: Option<String>,
}

/// "Did you mean" banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionBanner {
    pub prompt: String,
    /// Corrected query submitted when the banner is clicked.
    pub text: String,
}

/// Contents of the results region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultsBody {
    Cards(Vec<ResultCard>),
    NoResults(String),
}

/// Everything a full search renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedResults {
    pub status: String,
    pub correction: Option<CorrectionBanner>,
    pub body: ResultsBody,
    pub pagination: Vec<PageControl>,
}

/// Renders search payloads for one locale and page geometry.
#[derive(Debug, Clone, Copy)]
pub struct ResultRenderer {
    locale: Locale,
    page_size: u32,
    window_width: u32,
}

impl ResultRenderer {
    /// Creates a renderer.
    pub fn new(locale: Locale, page_size: u32, window_width: u32) -> Self {
        Self {
            locale,
            page_size,
            window_width,
        }
    }

    /// Renders `payload` as the results for `current_page`, with `input_text`
    /// being what the search box holds right now.
    pub fn render(
        &self,
        payload: &ResultPayload,
        input_text: &str,
        current_page: u32,
    ) -> RenderedResults {
        let messages = self.locale.messages();
        let status = self
            .locale
            .status_line(payload.total_hits, &payload.elapsed_label);
        let correction = correction_for(payload, input_text).map(|text| CorrectionBanner {
            prompt: messages.did_you_mean.to_string(),
            text,
        });

        if payload.hits.is_empty() {
            return RenderedResults {
                status,
                correction,
                body: ResultsBody::NoResults(messages.no_results.to_string()),
                pagination: Vec::new(),
            };
        }

        let cards = payload.hits.iter().map(|hit| self.card(hit)).collect();
        let pagination = build_controls(
            payload.total_hits,
            self.page_size,
            current_page,
            self.window_width,
            self.locale,
        );

        RenderedResults {
            status,
            correction,
            body: ResultsBody::Cards(cards),
            pagination,
        }
    }

    fn card(&self, hit: &Hit) -> ResultCard {
        let title = hit
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.locale.messages().untitled)
            .to_string();

        let url = hit
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty() && *u != PLACEHOLDER_URL);

        ResultCard {
            title,
            href: url.unwrap_or(PLACEHOLDER_URL).to_string(),
            display_url: url.map(str::to_string),
            score: hit.score.map(|s| format!("{:.2}", s)),
            snippet: hit
                .snippet
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Returns the top correction candidate if it is non-empty and differs from
/// the input once both are normalized.
pub fn correction_for(payload: &ResultPayload, input_text: &str) -> Option<String> {
    let candidate = payload.top_candidate()?.trim();
    if candidate.is_empty() {
        return None;
    }
    if normalize_query(candidate) == normalize_query(input_text) {
        return None;
    }
    Some(candidate.to_string())
}
