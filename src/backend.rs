//! Backend trait and the HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::payload::{AutocompleteResponse, SearchResponse};
use crate::{ControllerConfig, ControllerError, QueryRequest, Result, ResultPayload, SearchEndpoint};

const AUTOCOMPLETE_PATH: &str = "/autocomplete";

/// The remote services a search box talks to.
///
/// Implementations return already-normalized data; all response-shape
/// handling lives behind this trait.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetches completion strings for `request.q`.
    async fn autocomplete(&self, request: &QueryRequest) -> Result<Vec<String>>;

    /// Runs a full search.
    async fn search(&self, request: &QueryRequest) -> Result<ResultPayload>;
}

/// Backend reached over HTTP GET on the same origin.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    endpoint: SearchEndpoint,
}

impl HttpBackend {
    /// Creates a backend from controller configuration.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("searchbox/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            endpoint: config.endpoint,
        })
    }

    /// Creates a backend with a custom reqwest client.
    pub fn with_client(client: Client, base_url: impl Into<String>, endpoint: SearchEndpoint) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            endpoint,
        }
    }

    /// Returns the configured full-search endpoint.
    pub fn endpoint(&self) -> SearchEndpoint {
        self.endpoint
    }

    async fn get_text(&self, request: &QueryRequest, path: &str) -> Result<String> {
        let url = request.url(&self.base_url, path)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ControllerError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn autocomplete(&self, request: &QueryRequest) -> Result<Vec<String>> {
        let body = self.get_text(request, AUTOCOMPLETE_PATH).await?;
        let response = AutocompleteResponse::from_json(&body)?;
        Ok(response.into_suggestions(&request.q))
    }

    async fn search(&self, request: &QueryRequest) -> Result<ResultPayload> {
        let body = self.get_text(request, self.endpoint.path()).await?;
        let response = SearchResponse::from_json(&body)?;
        Ok(response.into_payload())
    }
}
