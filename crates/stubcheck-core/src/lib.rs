// crates/stubcheck-core/src/lib.rs
// ============================================================================
// Module: Stubcheck Core Library
// Description: Data model, scenario catalog, and suite orchestration.
// Purpose: Drive contract cases against a stubbed API and record outcomes.
// Dependencies: serde, serde_json, thiserror, time, tracing, url
// ============================================================================

//! ## Overview
//! `stubcheck-core` holds everything about the contract harness that does not
//! perform I/O: stub rules and their resolution order, the fixed scenario
//! catalog, outcome classification, the result recorder, and the suite
//! runner. Collaborators (the mock server admin API, the HTTP surface under
//! test, and the result store) are reached only through the traits in
//! [`interfaces`], so every piece can be exercised against in-process fakes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::ApiError;
pub use crate::core::ApiPayload;
pub use crate::core::CasePolarity;
pub use crate::core::CatalogError;
pub use crate::core::EntityCheck;
pub use crate::core::EqualTo;
pub use crate::core::ExecutionTime;
pub use crate::core::ExecutionTimeError;
pub use crate::core::Expectation;
pub use crate::core::HttpMethod;
pub use crate::core::PayloadError;
pub use crate::core::ProbeRequest;
pub use crate::core::ParseStatusError;
pub use crate::core::ProbeResponse;
pub use crate::core::RawOutcome;
pub use crate::core::RequestMatcher;
pub use crate::core::ResultRecord;
pub use crate::core::ScenarioCase;
pub use crate::core::ScenarioCatalog;
pub use crate::core::StatusCounts;
pub use crate::core::StubResponse;
pub use crate::core::StubRule;
pub use crate::core::TestName;
pub use crate::core::TestNameError;
pub use crate::core::TestStatus;
pub use crate::core::User;
pub use crate::core::UserFilter;
pub use crate::interfaces::ApiClient;
pub use crate::interfaces::ApiClientError;
pub use crate::interfaces::MockAdmin;
pub use crate::interfaces::MockAdminError;
pub use crate::interfaces::ResultStore;
pub use crate::interfaces::StoreError;
