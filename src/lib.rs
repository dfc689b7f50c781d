//! # searchbox
//!
//! A headless controller for an interactive search box.
//!
//! It decides when to ask a search backend for autocomplete suggestions and
//! results, reconciles the asynchronous answers with what the page currently
//! shows, and derives the rendered state:
//!
//! - Debounced autocomplete with keyboard navigation of the suggestion list
//! - Query sessions with "searching", error and result states
//! - "Did you mean" corrections and a sliding pagination window
//! - Tolerant decoding of the `/autocomplete`, `/search` and `/correction` shapes
//!
//! ## Example
//!
//! ```rust,no_run
//! use searchbox::{Controller, ControllerConfig, HttpBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ControllerConfig::default().with_base_url("http://localhost:8080");
//!     let backend = HttpBackend::new(&config)?;
//!     let mut controller = Controller::new(backend, config);
//!
//!     controller.set_input("rust");
//!     controller.submit("rust", 1).await;
//!     println!("{:?}", controller.view().status);
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod controller;
mod debounce;
mod error;
mod locale;
mod payload;
mod query;
mod session;

pub mod pagination;
pub mod render;
pub mod suggestion;
pub mod view;

pub use backend::{HttpBackend, SearchBackend};
pub use config::{ControllerConfig, ResponseOrdering, SearchEndpoint};
pub use controller::{Controller, KeyAction, SearchTicket, SuggestTicket};
pub use debounce::Debouncer;
pub use error::{ControllerError, Result};
pub use locale::{Locale, Messages};
pub use payload::{AutocompleteResponse, Hit, ResultPayload, SearchResponse};
pub use query::{normalize_query, QueryRequest, QueryState};
pub use session::{Event, Session};
