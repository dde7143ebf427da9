// crates/stubcheck-http/src/api.rs
// ============================================================================
// Module: HTTP API Client
// Description: ApiClient issuing blocking GET requests against the API under test.
// Purpose: Turn a request path into a decoded ProbeResponse.
// Dependencies: stubcheck-core, reqwest, tracing
// ============================================================================

//! ApiClient issuing blocking GET requests against the API under test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::blocking::Client;
use stubcheck_core::ApiClient;
use stubcheck_core::ApiClientError;
use stubcheck_core::ProbeResponse;
use tracing::debug;
use url::Url;

use crate::client::HttpClientConfig;
use crate::client::HttpSetupError;
use crate::client::build_http_client;
use crate::client::join_url;
use crate::client::read_response_limited;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking client for the users API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    /// API base URL.
    base_url: Url,
    /// Maximum response size read per request.
    max_response_bytes: usize,
    /// HTTP client used for requests.
    client: Client,
}

impl HttpApiClient {
    /// Creates an API client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSetupError::ClientBuild`] when the client cannot be built.
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpSetupError> {
        Ok(Self {
            base_url: config.base_url.clone(),
            max_response_bytes: config.max_response_bytes,
            client: build_http_client(config)?,
        })
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl ApiClient for HttpApiClient {
    fn get(&self, path: &str) -> Result<ProbeResponse, ApiClientError> {
        let url = join_url(&self.base_url, path).map_err(ApiClientError::Transport)?;
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| ApiClientError::Transport(format!("GET {url}: {err}")))?;
        let status = response.status().as_u16();
        let body = read_response_limited(&mut response, self.max_response_bytes)
            .map_err(ApiClientError::Transport)?;
        debug!(url = %url, status, bytes = body.len(), "api response received");
        Ok(ProbeResponse::decode(status, &body)?)
    }
}
