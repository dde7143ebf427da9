// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: System Test Harness
// Description: Wiring for HTTP collaborators, stores, and suite runners.
// Purpose: Build the same object graph the CLI builds, pointed at test servers.
// Dependencies: stubcheck-core, stubcheck-http, stubcheck-store-sqlite
// ============================================================================

use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use stubcheck_core::StubRule;
use stubcheck_core::runtime::SuiteRunner;
use stubcheck_core::runtime::standard_catalog;
use stubcheck_http::HttpApiClient;
use stubcheck_http::HttpClientConfig;
use stubcheck_http::WireMockAdminClient;
use stubcheck_store_sqlite::SqliteResultStore;
use stubcheck_store_sqlite::SqliteStoreConfig;
use system_tests::config::SystemTestConfig;

use super::mock_server_stub::MockServerStubHandle;
use super::mock_server_stub::spawn_mock_server_stub;
use super::timeouts::resolve_timeout_ms;

/// Default per-request timeout for system tests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Runner wired to real HTTP collaborators.
pub type HttpSuiteRunner<'a> =
    SuiteRunner<WireMockAdminClient, HttpApiClient, &'a SqliteResultStore>;

/// Mock server a suite talks to: the in-process stub or an external server.
pub struct MockTarget {
    stub: Option<MockServerStubHandle>,
    base_url: String,
}

impl MockTarget {
    /// Returns the mock server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the in-process stub, when one is in use.
    pub fn stub(&self) -> Option<&MockServerStubHandle> {
        self.stub.as_ref()
    }
}

/// Uses `STUBCHECK_SYSTEM_TEST_MOCK_URL` when set; otherwise spawns a stub.
pub fn mock_target() -> Result<MockTarget, String> {
    let config = SystemTestConfig::load()?;
    if let Some(base_url) = config.mock_url {
        return Ok(MockTarget {
            stub: None,
            base_url,
        });
    }
    let stub = spawn_mock_server_stub()?;
    Ok(MockTarget {
        base_url: stub.base_url().to_string(),
        stub: Some(stub),
    })
}

/// Builds the HTTP client configuration for `base_url`.
pub fn http_config(base_url: &str) -> Result<HttpClientConfig, String> {
    HttpClientConfig::new(base_url)
        .map(|config| config.with_timeout_ms(resolve_timeout_ms(REQUEST_TIMEOUT)))
        .map_err(|err| err.to_string())
}

/// Builds the admin and API clients for `base_url`.
pub fn http_collaborators(base_url: &str) -> Result<(WireMockAdminClient, HttpApiClient), String> {
    let config = http_config(base_url)?;
    let admin = WireMockAdminClient::new(&config).map_err(|err| err.to_string())?;
    let client = HttpApiClient::new(&config).map_err(|err| err.to_string())?;
    Ok((admin, client))
}

/// Builds a store handle for `path` without touching the file.
pub fn store_at(path: &Path) -> Result<SqliteResultStore, String> {
    SqliteResultStore::new(SqliteStoreConfig::for_path(path)).map_err(|err| err.to_string())
}

/// Builds a runner over the standard catalog against `base_url`.
pub fn http_runner<'a>(
    base_url: &str,
    store: &'a SqliteResultStore,
) -> Result<HttpSuiteRunner<'a>, String> {
    let (admin, client) = http_collaborators(base_url)?;
    Ok(SuiteRunner::new(admin, client, store))
}

/// Builds a runner that seeds `stub_rules` instead of the standard seed list.
pub fn http_runner_with_rules<'a>(
    base_url: &str,
    store: &'a SqliteResultStore,
    stub_rules: Vec<StubRule>,
) -> Result<HttpSuiteRunner<'a>, String> {
    Ok(http_runner(base_url, store)?.with_catalog(standard_catalog(), stub_rules))
}

/// Returns a loopback URL nothing listens on.
pub fn unreachable_base_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
