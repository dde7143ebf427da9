// crates/stubcheck-core/src/core/mod.rs
// ============================================================================
// Module: Stubcheck Core Types
// Description: Canonical data model for stubs, scenarios, and results.
// Purpose: Group the serializable types shared by every stubcheck crate.
// Dependencies: serde, time, url
// ============================================================================

//! ## Overview
//! Core types are plain data. They carry no I/O and no clock reads except
//! [`ExecutionTime::now`], which the store calls at write time.

pub mod identifiers;
pub mod payload;
pub mod record;
pub mod scenario;
pub mod status;
pub mod stub;

pub use identifiers::TestName;
pub use identifiers::TestNameError;
pub use payload::ApiError;
pub use payload::ApiPayload;
pub use payload::PayloadError;
pub use payload::ProbeResponse;
pub use payload::User;
pub use record::ExecutionTime;
pub use record::ExecutionTimeError;
pub use record::ResultRecord;
pub use scenario::CasePolarity;
pub use scenario::CatalogError;
pub use scenario::EntityCheck;
pub use scenario::Expectation;
pub use scenario::ScenarioCase;
pub use scenario::ScenarioCatalog;
pub use scenario::UserFilter;
pub use status::ParseStatusError;
pub use status::RawOutcome;
pub use status::StatusCounts;
pub use status::TestStatus;
pub use stub::EqualTo;
pub use stub::HttpMethod;
pub use stub::ProbeRequest;
pub use stub::RequestMatcher;
pub use stub::StubResponse;
pub use stub::StubRule;
