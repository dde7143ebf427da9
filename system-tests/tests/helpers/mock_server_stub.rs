// system-tests/tests/helpers/mock_server_stub.rs
// ============================================================================
// Module: Mock Server Stub
// Description: WireMock-compatible admin API and stub responder over axum.
// Purpose: Exercise the HTTP collaborators end to end without a JVM.
// Dependencies: axum, tokio, stubcheck-core
// ============================================================================

//! ## Overview
//! Implements the subset of the WireMock admin API the harness uses:
//! `POST /__admin/mappings/reset` (200) and `POST /__admin/mappings` (201).
//! Every other request is answered from the registered mappings with the same
//! precedence WireMock applies. Faults can be injected per handle.

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::thread;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use serde::Serialize;
use serde_json::json;
use stubcheck_core::HttpMethod;
use stubcheck_core::ProbeRequest;
use stubcheck_core::StubRule;
use stubcheck_core::runtime::resolve;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Admin-side fault injected into the stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminFault {
    /// Behave like WireMock.
    #[default]
    None,
    /// Answer resets with 500.
    ResetFails,
    /// Answer every mapping registration with 422.
    RejectMappings,
    /// Accept the first `n` mappings after a reset, then answer 422.
    RejectAfter(usize),
}

/// Admin call observed by the stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AdminCall {
    /// `POST /__admin/mappings/reset`.
    Reset,
    /// `POST /__admin/mappings` with the raw body.
    AddMapping(String),
}

#[derive(Debug, Default)]
struct StubServerState {
    rules: Vec<StubRule>,
    fault: AdminFault,
    admin_calls: Vec<AdminCall>,
    served: Vec<String>,
}

#[derive(Clone, Default)]
struct SharedState(Arc<Mutex<StubServerState>>);

impl SharedState {
    fn lock(&self) -> MutexGuard<'_, StubServerState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle for the stub mock server; stops the server on drop.
pub struct MockServerStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    state: SharedState,
}

impl MockServerStubHandle {
    /// Returns the server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a snapshot of the registered mappings in registration order.
    pub fn rules(&self) -> Vec<StubRule> {
        self.state.lock().rules.clone()
    }

    /// Returns the admin calls observed so far.
    pub fn admin_calls(&self) -> Vec<AdminCall> {
        self.state.lock().admin_calls.clone()
    }

    /// Returns the non-admin requests served, as `METHOD path?query`.
    pub fn served_requests(&self) -> Vec<String> {
        self.state.lock().served.clone()
    }

    /// Replaces the injected admin fault.
    pub fn set_fault(&self, fault: AdminFault) {
        self.state.lock().fault = fault;
    }

    /// Registers a mapping directly, bypassing the admin API.
    pub fn preload(&self, rule: StubRule) {
        self.state.lock().rules.push(rule);
    }
}

impl Drop for MockServerStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns a stub mock server on a loopback port.
pub fn spawn_mock_server_stub() -> Result<MockServerStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("mock stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("mock stub listener nonblocking failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("mock stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let state = SharedState::default();
    let app = Router::new()
        .route("/__admin/mappings/reset", post(handle_reset))
        .route("/__admin/mappings", post(handle_add_mapping))
        .fallback(handle_stubbed_request)
        .with_state(state.clone());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(MockServerStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        state,
    })
}

async fn handle_reset(State(state): State<SharedState>) -> Response {
    let mut guard = state.lock();
    guard.admin_calls.push(AdminCall::Reset);
    if guard.fault == AdminFault::ResetFails {
        return (StatusCode::INTERNAL_SERVER_ERROR, "reset failed").into_response();
    }
    guard.rules.clear();
    StatusCode::OK.into_response()
}

async fn handle_add_mapping(State(state): State<SharedState>, body: Bytes) -> Response {
    let raw = String::from_utf8_lossy(body.as_ref()).into_owned();
    let mut guard = state.lock();
    guard.admin_calls.push(AdminCall::AddMapping(raw));
    let rejected = match guard.fault {
        AdminFault::RejectMappings => true,
        AdminFault::RejectAfter(limit) => guard.rules.len() >= limit,
        AdminFault::None | AdminFault::ResetFails => false,
    };
    if rejected {
        return mapping_error("mapping rejected by fault injection");
    }
    let rule: StubRule = match serde_json::from_slice(body.as_ref()) {
        Ok(rule) => rule,
        Err(err) => return mapping_error(&err.to_string()),
    };
    let id = format!("stub-{}", guard.rules.len() + 1);
    let mut mapping = serde_json::to_value(&rule).unwrap_or_else(|_| json!({}));
    if let Some(object) = mapping.as_object_mut() {
        object.insert("id".to_string(), json!(id));
    }
    guard.rules.push(rule);
    (StatusCode::CREATED, Json(mapping)).into_response()
}

fn mapping_error(title: &str) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": [{ "title": title }] })))
        .into_response()
}

async fn handle_stubbed_request(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
) -> Response {
    let path_and_query = uri.path_and_query().map_or_else(|| uri.path(), |value| value.as_str());
    let mut guard = state.lock();
    guard.served.push(format!("{method} {path_and_query}"));
    let Some(method) = HttpMethod::parse(method.as_str()) else {
        return not_matched(path_and_query);
    };
    let request = ProbeRequest::parse(method, path_and_query);
    let Some(rule) = resolve(&guard.rules, &request) else {
        return not_matched(path_and_query);
    };
    let status =
        StatusCode::from_u16(rule.response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(rule.response.json_body.clone())).into_response();
    for (name, value) in &rule.response.headers {
        if let (Ok(name), Ok(value)) =
            (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value))
        {
            response.headers_mut().insert(name, value);
        }
    }
    response
}

fn not_matched(path_and_query: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": format!("Request was not matched: {path_and_query}"),
            "code": "NOT_FOUND",
        })),
    )
        .into_response()
}
