// crates/stubcheck-http/src/client.rs
// ============================================================================
// Module: HTTP Client Setup
// Description: Shared configuration and helpers for blocking HTTP clients.
// Purpose: Build bounded clients and join request paths onto a base URL.
// Dependencies: reqwest, thiserror, url
// ============================================================================

//! ## Overview
//! Both the mock admin client and the API client share one configuration
//! shape: a base URL, a whole-request timeout, and a response size ceiling.
//! Redirects are never followed; a stub that redirects is a contract bug the
//! suite should see.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default mock server base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Default whole-request timeout (ms).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default response size ceiling in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration shared by the HTTP collaborators.
///
/// # Invariants
/// - `base_url` uses `http` or `https`.
/// - `timeout_ms` applies to the full request lifecycle.
/// - `max_response_bytes` is a hard upper bound on response bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Server base URL; request paths are appended to it.
    pub base_url: Url,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Builds a configuration for `base_url` with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSetupError::InvalidBaseUrl`] when the URL does not parse
    /// or uses a scheme other than `http`/`https`.
    pub fn new(base_url: &str) -> Result<Self, HttpSetupError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: format!("stubcheck/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Replaces the request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing HTTP collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpSetupError {
    /// The base URL is unusable.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl {
        /// Offending URL text.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The HTTP client could not be built.
    #[error("http client build failed: {0}")]
    ClientBuild(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and checks a base URL.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, HttpSetupError> {
    let url = Url::parse(raw).map_err(|err| HttpSetupError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HttpSetupError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(HttpSetupError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "base url must not carry a query or fragment".to_string(),
        });
    }
    Ok(url)
}

/// Builds a blocking client honoring the configured limits.
pub(crate) fn build_http_client(config: &HttpClientConfig) -> Result<Client, HttpSetupError> {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .build()
        .map_err(|err| HttpSetupError::ClientBuild(err.to_string()))
}

/// Appends `path_and_query` (for example `/users?age=30`) to `base`.
pub(crate) fn join_url(base: &Url, path_and_query: &str) -> Result<Url, String> {
    let trimmed = base.as_str().trim_end_matches('/');
    let suffix = path_and_query.trim_start_matches('/');
    Url::parse(&format!("{trimmed}/{suffix}")).map_err(|err| err.to_string())
}

/// Reads a response body, failing when it exceeds `max_bytes`.
pub(crate) fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, String> {
    let max_bytes_u64 =
        u64::try_from(max_bytes).map_err(|_| "response size limit exceeds u64".to_string())?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err("http response exceeds size limit".to_string());
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| format!("failed to read response: {err}"))?;
    if buf.len() > max_bytes {
        return Err("http response exceeds size limit".to_string());
    }
    Ok(buf)
}
