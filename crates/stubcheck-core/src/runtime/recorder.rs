// crates/stubcheck-core/src/runtime/recorder.rs
// ============================================================================
// Module: Result Recorder
// Description: Resolves the persistence key of a completed case and stores its status.
// Purpose: Persist every completed case exactly once, whatever its outcome.
// Dependencies: crate::core, crate::interfaces, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`CaseResult`] is what a test framework hands over after a case
//! finishes: the method that ran, the parameters it ran with, and a raw
//! outcome. [`ResultRecorder::record`] resolves the key, classifies the
//! outcome, and issues a single upsert. A persistence failure is returned
//! alongside the status that was already decided; it never rewrites it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use tracing::info;

use crate::core::RawOutcome;
use crate::core::TestName;
use crate::core::TestStatus;
use crate::interfaces::ResultStore;
use crate::interfaces::StoreError;
use crate::runtime::classify::classify;

// ============================================================================
// SECTION: Case Results
// ============================================================================

/// One parameter a case was invoked with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CaseParameter {
    /// String parameter.
    Text(String),
    /// Integer parameter.
    Integer(i64),
}

/// Outcome of one completed case as reported by the executing framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Identifier of the test method that ran.
    pub method_name: TestName,
    /// Parameters the method was invoked with, in order.
    pub parameters: Vec<CaseParameter>,
    /// Raw framework outcome.
    pub outcome: RawOutcome,
    /// Failure detail, when any.
    pub detail: Option<String>,
}

/// Resolves the persistence key for a completed case.
///
/// A leading text parameter that is a valid [`TestName`] is the key;
/// otherwise the method name is.
#[must_use]
pub fn resolve_result_key(result: &CaseResult) -> TestName {
    match result.parameters.first() {
        Some(CaseParameter::Text(raw)) => {
            TestName::new(raw).unwrap_or_else(|_| result.method_name.clone())
        }
        _ => result.method_name.clone(),
    }
}

// ============================================================================
// SECTION: Recorder
// ============================================================================

/// Key and status written for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedResult {
    /// Persistence key.
    pub test_name: TestName,
    /// Classified status.
    pub status: TestStatus,
}

/// The store refused a result; the classified status is kept intact.
#[derive(Debug, Clone, Error)]
#[error("failed to persist {status} for {test_name}: {source}")]
pub struct RecordError {
    /// Key the write targeted.
    pub test_name: TestName,
    /// Status the case was classified as.
    pub status: TestStatus,
    /// Underlying store error.
    #[source]
    pub source: StoreError,
}

/// Forwards classified case outcomes to a [`ResultStore`].
#[derive(Debug, Clone)]
pub struct ResultRecorder<S> {
    /// Store every recorded outcome is upserted into.
    store: S,
}

impl<S: ResultStore> ResultRecorder<S> {
    /// Wraps a result store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Returns the wrapped store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Ensures the store schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be initialized.
    pub fn initialize(&self) -> Result<(), StoreError> {
        self.store.initialize()
    }

    /// Classifies `result` and upserts it exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] carrying the classified status when the write fails.
    pub fn record(&self, result: &CaseResult) -> Result<RecordedResult, RecordError> {
        let test_name = resolve_result_key(result);
        let status = classify(result.outcome);
        match self.store.upsert(&test_name, status) {
            Ok(()) => {
                info!(test_name = %test_name, status = %status, "result recorded");
                Ok(RecordedResult {
                    test_name,
                    status,
                })
            }
            Err(source) => {
                error!(
                    test_name = %test_name,
                    status = %status,
                    error = %source,
                    "result not recorded"
                );
                Err(RecordError {
                    test_name,
                    status,
                    source,
                })
            }
        }
    }
}
