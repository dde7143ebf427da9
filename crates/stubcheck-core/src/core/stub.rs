// crates/stubcheck-core/src/core/stub.rs
// ============================================================================
// Module: Stubcheck Stub Rules
// Description: Declarative request-matcher-to-response mappings.
// Purpose: Model mock-server stub descriptors with a WireMock-compatible wire form.
// Dependencies: serde, serde_json, url
// ============================================================================

//! ## Overview
//! A [`StubRule`] serializes directly as a WireMock mapping descriptor:
//!
//! ```json
//! {"priority":1,
//!  "request":{"method":"GET","urlPath":"/users",
//!             "queryParameters":{"forceError":{"equalTo":"true"}}},
//!  "response":{"status":500,"headers":{"Content-Type":"application/json"},"jsonBody":{...}}}
//! ```
//!
//! Matching compares method, path, and query-parameter equality. Choosing
//! between several matching rules is [`crate::runtime::matching::resolve`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::runtime::matching::DEFAULT_STUB_PRIORITY;

// ============================================================================
// SECTION: HTTP Method
// ============================================================================

/// HTTP verb a stub rule matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
    /// `HEAD`.
    Head,
    /// `OPTIONS`.
    Options,
}

impl HttpMethod {
    /// Returns the canonical verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Parses a verb, ignoring ASCII case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        [
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Patch,
            Self::Delete,
            Self::Head,
            Self::Options,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Request Matching
// ============================================================================

/// Equality constraint on a single query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EqualTo {
    /// Required parameter value.
    pub equal_to: String,
}

/// Request side of a stub rule.
///
/// # Invariants
/// - `url_path` excludes the query string.
/// - Query constraints are order-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMatcher {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Exact path to match.
    pub url_path: String,
    /// Query parameters that must be present with equal values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_parameters: BTreeMap<String, EqualTo>,
}

impl RequestMatcher {
    /// Returns true when `request` satisfies method, path, and every query constraint.
    #[must_use]
    pub fn matches(&self, request: &ProbeRequest) -> bool {
        self.method == request.method
            && self.url_path == request.path
            && self
                .query_parameters
                .iter()
                .all(|(name, constraint)| request.has_query(name, &constraint.equal_to))
    }

    /// Returns true when `self` matches a strict subset of the requests `other` matches.
    ///
    /// Both matchers must target the same method and path, and `self` must carry
    /// every constraint of `other` plus at least one more.
    #[must_use]
    pub fn is_strictly_more_specific_than(&self, other: &Self) -> bool {
        self.method == other.method
            && self.url_path == other.url_path
            && self.query_parameters.len() > other.query_parameters.len()
            && other
                .query_parameters
                .iter()
                .all(|(name, constraint)| self.query_parameters.get(name) == Some(constraint))
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Response side of a stub rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Structured JSON body.
    #[serde(default)]
    pub json_body: Value,
}

// ============================================================================
// SECTION: Stub Rule
// ============================================================================

/// Declarative mock-server directive.
///
/// # Invariants
/// - Immutable once registered for a suite run.
/// - Lower `priority` values win; `None` means [`DEFAULT_STUB_PRIORITY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubRule {
    /// Optional explicit priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    /// Request matcher.
    pub request: RequestMatcher,
    /// Response returned on a match.
    pub response: StubResponse,
}

impl StubRule {
    /// Starts a `GET` rule for `path` that answers `200` with a JSON `null` body.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            priority: None,
            request: RequestMatcher {
                method: HttpMethod::Get,
                url_path: path.into(),
                query_parameters: BTreeMap::new(),
            },
            response: StubResponse {
                status: 200,
                headers: BTreeMap::new(),
                json_body: Value::Null,
            },
        }
    }

    /// Adds a query-parameter equality constraint.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query_parameters.insert(
            name.into(),
            EqualTo {
                equal_to: value.into(),
            },
        );
        self
    }

    /// Sets an explicit priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a JSON response with the matching `Content-Type` header.
    #[must_use]
    pub fn responding_json(mut self, status: u16, body: Value) -> Self {
        self.response.status = status;
        self.response.headers.insert("Content-Type".to_string(), "application/json".to_string());
        self.response.json_body = body;
        self
    }

    /// Returns the priority used for resolution.
    #[must_use]
    pub fn effective_priority(&self) -> u32 {
        self.priority.unwrap_or(DEFAULT_STUB_PRIORITY)
    }
}

// ============================================================================
// SECTION: Probe Request
// ============================================================================

/// Incoming request as seen by a stub matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path without the query string.
    pub path: String,
    /// Decoded query pairs in request order.
    pub query: Vec<(String, String)>,
}

impl ProbeRequest {
    /// Splits `path_and_query` (for example `/users?age=30`) into path and decoded pairs.
    #[must_use]
    pub fn parse(method: HttpMethod, path_and_query: &str) -> Self {
        let (path, query) = path_and_query.split_once('?').unwrap_or((path_and_query, ""));
        let query = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        Self {
            method,
            path: path.to_string(),
            query,
        }
    }

    /// Returns true when any `name` pair carries `value`.
    #[must_use]
    pub fn has_query(&self, name: &str, value: &str) -> bool {
        self.query.iter().any(|(key, candidate)| key == name && candidate == value)
    }
}
