// crates/stubcheck-http/src/memory.rs
// ============================================================================
// Module: In-Memory Mock Server
// Description: Process-local MockAdmin and ApiClient sharing one rule table.
// Purpose: Run the full suite without a mock server process.
// Dependencies: stubcheck-core, serde_json
// ============================================================================

//! ## Overview
//! [`InMemoryMockAdmin`] stores registered rules in registration order and
//! answers requests with [`resolve`], the same precedence the WireMock
//! client relies on. Unmatched requests get a `404` error body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use serde_json::json;
use stubcheck_core::ApiClient;
use stubcheck_core::ApiClientError;
use stubcheck_core::HttpMethod;
use stubcheck_core::MockAdmin;
use stubcheck_core::MockAdminError;
use stubcheck_core::ProbeRequest;
use stubcheck_core::ProbeResponse;
use stubcheck_core::StubResponse;
use stubcheck_core::StubRule;
use stubcheck_core::runtime::resolve;

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Process-local mock server.
///
/// # Invariants
/// - Rules are kept in registration order.
#[derive(Debug, Default)]
pub struct InMemoryMockAdmin {
    /// Registered rules.
    rules: Mutex<Vec<StubRule>>,
    /// Number of resets observed.
    resets: AtomicUsize,
}

impl InMemoryMockAdmin {
    /// Creates an empty server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the registered rules.
    #[must_use]
    pub fn rules(&self) -> Vec<StubRule> {
        self.lock_rules().clone()
    }

    /// Returns the number of resets observed.
    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    /// Answers a request the way the server would.
    #[must_use]
    pub fn respond(&self, method: HttpMethod, path_and_query: &str) -> StubResponse {
        let request = ProbeRequest::parse(method, path_and_query);
        let rules = self.lock_rules();
        resolve(&rules, &request).map_or_else(
            || StubResponse {
                status: 404,
                headers: BTreeMap::from([(
                    "Content-Type".to_string(),
                    "application/json".to_string(),
                )]),
                json_body: json!({
                    "message": format!("No stub matched {method} {path_and_query}"),
                    "code": "NOT_FOUND",
                }),
            },
            |rule| rule.response.clone(),
        )
    }

    /// Locks the rule table, recovering from a poisoned lock.
    fn lock_rules(&self) -> MutexGuard<'_, Vec<StubRule>> {
        self.rules.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MockAdmin for InMemoryMockAdmin {
    fn reset_all(&self) -> Result<(), MockAdminError> {
        self.lock_rules().clear();
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn add_stub(&self, rule: &StubRule) -> Result<(), MockAdminError> {
        if !rule.request.url_path.starts_with('/') {
            return Err(MockAdminError::StubRejected {
                status: 422,
                detail: format!("urlPath must be absolute: '{}'", rule.request.url_path),
            });
        }
        self.lock_rules().push(rule.clone());
        Ok(())
    }
}

impl ApiClient for InMemoryMockAdmin {
    fn get(&self, path: &str) -> Result<ProbeResponse, ApiClientError> {
        let response = self.respond(HttpMethod::Get, path);
        let body = serde_json::to_vec(&response.json_body)
            .map_err(|err| ApiClientError::Transport(err.to_string()))?;
        Ok(ProbeResponse::decode(response.status, &body)?)
    }
}
