//! Response decoding.
//!
//! Each endpoint has its own wire shape (and `/search` vs `/correction` disagree
//! on almost everything). The decoders here pick the variant from the body,
//! tolerate missing or mistyped fields, and normalize into [`ResultPayload`] or
//! a plain list of suggestion strings before any rendering happens.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Result;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// One search hit, normalized across backend shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub title: Option<String>,
    pub url: Option<String>,
    pub score: Option<f64>,
    /// Highlighted (tag-stripped) or raw body text.
    pub snippet: Option<String>,
}

impl Hit {
    /// Creates a hit with a title and URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Sets the relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Sets the snippet text.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// A full-search response, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub total_hits: u64,
    pub elapsed_label: String,
    pub hits: Vec<Hit>,
    pub correction_candidates: Vec<String>,
}

impl Default for ResultPayload {
    fn default() -> Self {
        Self {
            total_hits: 0,
            elapsed_label: DEFAULT_ELAPSED.to_string(),
            hits: Vec::new(),
            correction_candidates: Vec::new(),
        }
    }
}

impl ResultPayload {
    /// Creates an empty payload reporting `total_hits`.
    pub fn new(total_hits: u64) -> Self {
        Self {
            total_hits,
            ..Default::default()
        }
    }

    /// Adds a hit.
    pub fn with_hit(mut self, hit: Hit) -> Self {
        self.hits.push(hit);
        self
    }

    /// Adds a correction candidate.
    pub fn with_candidate(mut self, candidate: impl Into<String>) -> Self {
        self.correction_candidates.push(candidate.into());
        self
    }

    /// Sets the elapsed time label.
    pub fn with_elapsed(mut self, elapsed: impl Into<String>) -> Self {
        self.elapsed_label = elapsed.into();
        self
    }

    /// Returns the first correction candidate, if any.
    pub fn top_candidate(&self) -> Option<&str> {
        self.correction_candidates.first().map(String::as_str)
    }
}

const DEFAULT_ELAPSED: &str = "0s";

// --- lenient field helpers ---

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Deserializes an array, dropping elements that do not fit `T`.
/// Anything that is not an array yields an empty list.
fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn count_of(value: &Value) -> u64 {
    let raw = match value {
        Value::Object(map) => map.get("value").and_then(Value::as_f64),
        other => other.as_f64(),
    };
    raw.filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n as u64)
        .unwrap_or(0)
}

fn strip_markup(fragment: &str) -> String {
    MARKUP_TAG.replace_all(fragment, "").trim().to_string()
}

// --- autocomplete ---

#[derive(Debug, Default, Deserialize)]
struct Completion {
    #[serde(default, deserialize_with = "lenient_string")]
    suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionsBody {
    #[serde(default, deserialize_with = "lenient_vec")]
    results: Vec<Completion>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestionsBody {
    #[serde(default, deserialize_with = "lenient_vec")]
    suggestions: Vec<String>,
}

/// An `/autocomplete` response.
#[derive(Debug)]
pub enum AutocompleteResponse {
    /// `{ results: [{ suffix, title, url }] }`: suffixes appended to the query.
    Completions(Vec<Option<String>>),
    /// `{ suggestions: [string] }`: pre-formed strings.
    Suggestions(Vec<String>),
    /// Neither shape was present.
    Empty,
}

impl AutocompleteResponse {
    /// Decodes a response body. Only invalid JSON is an error.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;

        if value.get("suggestions").is_some_and(Value::is_array) {
            let body: SuggestionsBody = serde_json::from_value(value)?;
            return Ok(Self::Suggestions(body.suggestions));
        }
        if value.get("results").is_some_and(Value::is_array) {
            let body: CompletionsBody = serde_json::from_value(value)?;
            return Ok(Self::Completions(
                body.results.into_iter().map(|c| c.suffix).collect(),
            ));
        }
        Ok(Self::Empty)
    }

    /// Produces the full suggestion strings for `query`.
    pub fn into_suggestions(self, query: &str) -> Vec<String> {
        match self {
            Self::Completions(suffixes) => suffixes
                .into_iter()
                .map(|suffix| format!("{}{}", query, suffix.unwrap_or_default()))
                .collect(),
            Self::Suggestions(items) => items,
            Self::Empty => Vec::new(),
        }
    }
}

// --- full search ---

#[derive(Debug, Default, Deserialize)]
struct FlatHit {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    score: Option<f64>,
}

/// `/search`: `{ time_taken, total_hits, results: [...], suggestions? }`.
#[derive(Debug, Default, Deserialize)]
pub struct FlatBody {
    #[serde(default, deserialize_with = "lenient_string")]
    time_taken: Option<String>,
    #[serde(default)]
    total_hits: Value,
    #[serde(default, deserialize_with = "lenient_vec")]
    results: Vec<FlatHit>,
    #[serde(default, deserialize_with = "lenient_vec")]
    suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SourceDoc {
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(default, alias = "url", deserialize_with = "lenient_string")]
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(default, alias = "body", deserialize_with = "lenient_string")]
    #[serde(rename = "Body")]
    body: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Highlight {
    #[serde(default, deserialize_with = "lenient_vec")]
    body: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHit {
    #[serde(default, rename = "_source")]
    source: SourceDoc,
    #[serde(default, rename = "_score", deserialize_with = "lenient_f64")]
    score: Option<f64>,
    #[serde(default)]
    highlight: Option<Highlight>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Value,
    #[serde(default, deserialize_with = "lenient_vec")]
    hits: Vec<RawHit>,
}

/// `/correction`: `{ time_taken, correction?, results: { total, hits } }`.
#[derive(Debug, Default, Deserialize)]
pub struct CorrectionBody {
    #[serde(default, deserialize_with = "lenient_string")]
    time_taken: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    correction: Option<String>,
    #[serde(default)]
    results: RawHits,
    #[serde(default, deserialize_with = "lenient_vec")]
    suggestions: Vec<String>,
}

/// A full-search response in one of the two backend shapes.
#[derive(Debug)]
pub enum SearchResponse {
    Flat(FlatBody),
    Correction(CorrectionBody),
}

impl SearchResponse {
    /// Decodes a response body, choosing the shape by whether `results` is
    /// an object. Only invalid JSON is an error.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Ok(Self::Flat(FlatBody::default()));
        }

        if value.get("results").is_some_and(Value::is_object) {
            Ok(Self::Correction(serde_json::from_value(value)?))
        } else {
            Ok(Self::Flat(serde_json::from_value(value)?))
        }
    }

    /// Normalizes into a [`ResultPayload`].
    pub fn into_payload(self) -> ResultPayload {
        match self {
            Self::Flat(body) => ResultPayload {
                total_hits: count_of(&body.total_hits),
                elapsed_label: body.time_taken.unwrap_or_else(|| DEFAULT_ELAPSED.to_string()),
                hits: body
                    .results
                    .into_iter()
                    .map(|hit| Hit {
                        title: hit.title,
                        url: hit.url,
                        score: hit.score,
                        snippet: None,
                    })
                    .collect(),
                correction_candidates: body.suggestions,
            },
            Self::Correction(body) => {
                let mut candidates: Vec<String> = body.correction.into_iter().collect();
                candidates.extend(body.suggestions);

                ResultPayload {
                    total_hits: count_of(&body.results.total),
                    elapsed_label: body.time_taken.unwrap_or_else(|| DEFAULT_ELAPSED.to_string()),
                    hits: body
                        .results
                        .hits
                        .into_iter()
                        .map(|hit| {
                            let highlighted = hit
                                .highlight
                                .and_then(|h| h.body.into_iter().next())
                                .map(|fragment| strip_markup(&fragment));
                            Hit {
                                title: hit.source.title,
                                url: hit.source.url,
                                score: hit.score,
                                snippet: highlighted.or(hit.source.body),
                            }
                        })
                        .collect(),
                    correction_candidates: candidates,
                }
            }
        }
    }
}
