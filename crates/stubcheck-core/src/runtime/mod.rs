// crates/stubcheck-core/src/runtime/mod.rs
// ============================================================================
// Module: Stubcheck Runtime
// Description: Stub resolution, catalog data, evaluation, and suite orchestration.
// Purpose: Turn the static catalog into recorded outcomes through injected collaborators.
// Dependencies: crate::core, crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! Control flow is strictly sequential: [`SuiteRunner::setup`] resets and
//! seeds the mock server and initializes the store, then
//! [`SuiteRunner::run`] walks the catalog, classifies each case, and hands
//! the result to the [`ResultRecorder`].

pub mod catalog;
pub mod classify;
pub mod configurator;
pub mod evaluate;
pub mod matching;
pub mod recorder;
pub mod runner;

pub use catalog::standard_catalog;
pub use catalog::users_stub_rules;
pub use classify::classify;
pub use configurator::MockConfigurator;
pub use configurator::SeedError;
pub use evaluate::AssertionMismatch;
pub use evaluate::evaluate;
pub use matching::DEFAULT_STUB_PRIORITY;
pub use matching::StubOrderError;
pub use matching::resolve;
pub use matching::validate_registration_order;
pub use recorder::CaseParameter;
pub use recorder::CaseResult;
pub use recorder::RecordError;
pub use recorder::RecordedResult;
pub use recorder::ResultRecorder;
pub use recorder::resolve_result_key;
pub use runner::CaseOutcome;
pub use runner::RunOptions;
pub use runner::SuiteError;
pub use runner::SuiteReport;
pub use runner::SuiteRunner;
