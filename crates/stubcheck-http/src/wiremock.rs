// crates/stubcheck-http/src/wiremock.rs
// ============================================================================
// Module: WireMock Admin Client
// Description: MockAdmin over the WireMock administrative HTTP API.
// Purpose: Reset and register stub mappings on a running mock server.
// Dependencies: stubcheck-core, reqwest, serde_json, tracing
// ============================================================================

//! ## Overview
//! The admin API lives under `{base_url}/__admin`:
//! - `POST /mappings/reset` clears every mapping and answers `200`.
//! - `POST /mappings` registers one mapping and answers `201`.
//!
//! Any other status is treated as a refusal. Transport failures on either
//! call mean the server is unavailable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use stubcheck_core::MockAdmin;
use stubcheck_core::MockAdminError;
use stubcheck_core::StubRule;
use tracing::debug;
use url::Url;

use crate::client::HttpClientConfig;
use crate::client::HttpSetupError;
use crate::client::build_http_client;
use crate::client::join_url;
use crate::client::read_response_limited;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Admin API prefix appended to the server base URL.
pub const ADMIN_PREFIX: &str = "__admin";

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking client for the WireMock admin API.
#[derive(Debug, Clone)]
pub struct WireMockAdminClient {
    /// Admin API base (`{base_url}/__admin`).
    admin_base: Url,
    /// Maximum response size read from the server.
    max_response_bytes: usize,
    /// HTTP client used for admin requests.
    client: Client,
}

impl WireMockAdminClient {
    /// Creates an admin client for the server at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSetupError`] when the admin URL or the client cannot be built.
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpSetupError> {
        let admin_base =
            join_url(&config.base_url, ADMIN_PREFIX).map_err(|reason| {
                HttpSetupError::InvalidBaseUrl {
                    url: config.base_url.to_string(),
                    reason,
                }
            })?;
        Ok(Self {
            admin_base,
            max_response_bytes: config.max_response_bytes,
            client: build_http_client(config)?,
        })
    }

    /// Returns the admin API base URL.
    #[must_use]
    pub const fn admin_base(&self) -> &Url {
        &self.admin_base
    }

    /// Resolves an admin endpoint.
    fn endpoint(&self, path: &str) -> Result<Url, MockAdminError> {
        join_url(&self.admin_base, path).map_err(MockAdminError::Unavailable)
    }
}

impl MockAdmin for WireMockAdminClient {
    fn reset_all(&self) -> Result<(), MockAdminError> {
        let url = self.endpoint("/mappings/reset")?;
        let response = self
            .client
            .post(url.clone())
            .send()
            .map_err(|err| MockAdminError::Unavailable(format!("POST {url}: {err}")))?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(MockAdminError::Unavailable(format!(
                "POST {url} returned {}, expected 200",
                status.as_u16()
            )));
        }
        debug!(url = %url, "mappings reset");
        Ok(())
    }

    fn add_stub(&self, rule: &StubRule) -> Result<(), MockAdminError> {
        let url = self.endpoint("/mappings")?;
        let body = serde_json::to_vec(rule).map_err(|err| MockAdminError::Encode(err.to_string()))?;
        let mut response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| MockAdminError::Unavailable(format!("POST {url}: {err}")))?;
        let status = response.status();
        if status != StatusCode::CREATED {
            let detail = read_response_limited(&mut response, self.max_response_bytes)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_else(|err| err);
            return Err(MockAdminError::StubRejected {
                status: status.as_u16(),
                detail,
            });
        }
        debug!(url = %url, path = %rule.request.url_path, "mapping created");
        Ok(())
    }
}
