// crates/stubcheck-http/src/lib.rs
// ============================================================================
// Module: Stubcheck HTTP Collaborators
// Description: Blocking HTTP implementations of the mock admin and API client traits.
// Purpose: Connect the suite runner to a WireMock-compatible server.
// Dependencies: stubcheck-core, reqwest, url
// ============================================================================

//! ## Overview
//! - [`WireMockAdminClient`]: [`stubcheck_core::MockAdmin`] over the WireMock admin API.
//! - [`HttpApiClient`]: [`stubcheck_core::ApiClient`] over plain `GET` requests.
//! - [`InMemoryMockAdmin`]: both traits at once, in process, for dry runs and tests.

pub mod api;
pub mod client;
pub mod memory;
pub mod wiremock;

pub use api::HttpApiClient;
pub use client::DEFAULT_BASE_URL;
pub use client::DEFAULT_MAX_RESPONSE_BYTES;
pub use client::DEFAULT_TIMEOUT_MS;
pub use client::HttpClientConfig;
pub use client::HttpSetupError;
pub use memory::InMemoryMockAdmin;
pub use wiremock::ADMIN_PREFIX;
pub use wiremock::WireMockAdminClient;
