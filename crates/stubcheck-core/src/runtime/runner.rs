// crates/stubcheck-core/src/runtime/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Setup, case execution, and result hand-off for one suite run.
// Purpose: Abort on setup failures; isolate per-case failures.
// Dependencies: crate::core, crate::interfaces, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`SuiteRunner`] borrows its three collaborators as capabilities. A run is
//! two phases:
//! - [`SuiteRunner::setup`]: reset the mock server, seed the stub rules, and
//!   initialize the result store. Any failure here is fatal.
//! - [`SuiteRunner::run`]: execute positive then negative cases in catalog
//!   order. An assertion mismatch or a transport error fails that case only;
//!   a persistence failure aborts the run.
//!
//! Every executed or skipped case reaches the recorder exactly once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing::warn;

use crate::core::CasePolarity;
use crate::core::CatalogError;
use crate::core::Expectation;
use crate::core::RawOutcome;
use crate::core::ScenarioCase;
use crate::core::ScenarioCatalog;
use crate::core::StatusCounts;
use crate::core::StubRule;
use crate::core::TestName;
use crate::core::TestStatus;
use crate::interfaces::ApiClient;
use crate::interfaces::MockAdmin;
use crate::interfaces::MockAdminError;
use crate::interfaces::ResultStore;
use crate::runtime::catalog::standard_catalog;
use crate::runtime::catalog::users_stub_rules;
use crate::runtime::configurator::MockConfigurator;
use crate::runtime::configurator::SeedError;
use crate::runtime::evaluate::evaluate;
use crate::runtime::matching::StubOrderError;
use crate::runtime::recorder::CaseParameter;
use crate::runtime::recorder::CaseResult;
use crate::runtime::recorder::ResultRecorder;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Method identifier reported for positive cases.
const POSITIVE_METHOD: &str = "positiveCases";
/// Method identifier reported for negative cases.
const NEGATIVE_METHOD: &str = "negativeCases";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal suite failures.
#[derive(Debug, Clone, Error)]
pub enum SuiteError {
    /// The catalog violates its invariants.
    #[error("scenario catalog invalid: {0}")]
    Catalog(#[from] CatalogError),
    /// A skip request names no case in the catalog.
    #[error("no case named {0} in the scenario catalog")]
    UnknownCase(String),
    /// The mock server did not acknowledge a reset or registration.
    #[error("mock server unavailable: {0}")]
    MockServerUnavailable(String),
    /// The mock server rejected a stub rule.
    #[error("mock server rejected a stub: {0}")]
    StubRegistration(String),
    /// The stub seed list is misordered.
    #[error("stub seed order invalid: {0}")]
    StubOrder(StubOrderError),
    /// The result store could not be initialized or written.
    #[error("result store failure: {0}")]
    Persistence(String),
}

impl SuiteError {
    /// Names the dependency that caused the failure.
    #[must_use]
    pub const fn dependency(&self) -> &'static str {
        match self {
            Self::Catalog(_) | Self::UnknownCase(_) => "scenario catalog",
            Self::MockServerUnavailable(_) | Self::StubRegistration(_) | Self::StubOrder(_) => {
                "mock server"
            }
            Self::Persistence(_) => "result store",
        }
    }
}

impl From<MockAdminError> for SuiteError {
    fn from(error: MockAdminError) -> Self {
        match &error {
            MockAdminError::Unavailable(_) => Self::MockServerUnavailable(error.to_string()),
            MockAdminError::StubRejected {
                ..
            }
            | MockAdminError::Encode(_) => Self::StubRegistration(error.to_string()),
        }
    }
}

impl From<SeedError> for SuiteError {
    fn from(error: SeedError) -> Self {
        match error {
            SeedError::Order(order) => Self::StubOrder(order),
            SeedError::Admin(admin) => admin.into(),
        }
    }
}

// ============================================================================
// SECTION: Options and Reports
// ============================================================================

/// Per-run options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Case names recorded as skipped without being executed.
    pub skip: BTreeSet<String>,
}

impl RunOptions {
    /// Builds options that skip the given case names.
    #[must_use]
    pub fn skipping<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            skip: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Recorded outcome of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    /// Key the outcome was stored under.
    pub name: TestName,
    /// Case polarity.
    pub polarity: CasePolarity,
    /// Stored status.
    pub status: TestStatus,
    /// Failure or skip detail.
    pub detail: Option<String>,
}

/// Outcomes of one run in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Per-case outcomes.
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// Returns the status breakdown.
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        self.outcomes.iter().map(|outcome| outcome.status).collect()
    }

    /// Returns true when every executed case passed.
    ///
    /// Skipped cases are not executed and do not count against the run.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| matches!(outcome.status, TestStatus::Passed | TestStatus::Skipped))
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Sequential contract-suite runner over injected collaborators.
#[derive(Debug)]
pub struct SuiteRunner<A, C, S> {
    /// Resets and seeds the mock server during setup.
    configurator: MockConfigurator<A>,
    /// Issues each case's request.
    client: C,
    /// Persists each case's classified status.
    recorder: ResultRecorder<S>,
    /// Cases executed, positive first.
    catalog: ScenarioCatalog,
    /// Rules seeded before any case runs, in registration order.
    stub_rules: Vec<StubRule>,
}

impl<A, C, S> SuiteRunner<A, C, S>
where
    A: MockAdmin,
    C: ApiClient,
    S: ResultStore,
{
    /// Creates a runner over the standard users catalog and its seed rules.
    #[must_use]
    pub fn new(admin: A, client: C, store: S) -> Self {
        Self {
            configurator: MockConfigurator::new(admin),
            client,
            recorder: ResultRecorder::new(store),
            catalog: standard_catalog(),
            stub_rules: users_stub_rules(),
        }
    }

    /// Replaces the catalog and the stub rules seeded for it.
    #[must_use]
    pub fn with_catalog(mut self, catalog: ScenarioCatalog, stub_rules: Vec<StubRule>) -> Self {
        self.catalog = catalog;
        self.stub_rules = stub_rules;
        self
    }

    /// Returns the catalog this runner executes.
    #[must_use]
    pub const fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Returns the mock configurator.
    #[must_use]
    pub const fn configurator(&self) -> &MockConfigurator<A> {
        &self.configurator
    }

    /// Resets and seeds the mock server, then initializes the result store.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] naming the first dependency that failed.
    pub fn setup(&self) -> Result<(), SuiteError> {
        self.catalog.validate()?;
        self.configurator.reset_all()?;
        self.configurator.seed_rules(&self.stub_rules)?;
        self.recorder.initialize().map_err(|err| SuiteError::Persistence(err.to_string()))?;
        info!(cases = self.catalog.len(), "suite setup complete");
        Ok(())
    }

    /// Executes every case and records each outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::UnknownCase`] when a skip name matches no case, or
    /// [`SuiteError::Persistence`] when an outcome cannot be stored.
    pub fn run(&self, options: &RunOptions) -> Result<SuiteReport, SuiteError> {
        self.check_skips(options)?;
        let mut report = SuiteReport::default();
        for case in self.catalog.cases() {
            let result = self.execute_case(case, options);
            let recorded = self
                .recorder
                .record(&result)
                .map_err(|err| SuiteError::Persistence(err.to_string()))?;
            report.outcomes.push(CaseOutcome {
                name: recorded.test_name,
                polarity: case.polarity(),
                status: recorded.status,
                detail: result.detail,
            });
        }
        info!(counts = %report.counts(), "suite run complete");
        Ok(report)
    }

    /// Runs [`Self::setup`] then [`Self::run`].
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] from either phase. Unknown skip names are
    /// rejected before the mock server is touched.
    pub fn execute_suite(&self, options: &RunOptions) -> Result<SuiteReport, SuiteError> {
        self.check_skips(options)?;
        self.setup()?;
        self.run(options)
    }

    /// Rejects skip names that match no catalog case.
    fn check_skips(&self, options: &RunOptions) -> Result<(), SuiteError> {
        match options.skip.iter().find(|name| !self.catalog.contains(name)) {
            Some(name) => Err(SuiteError::UnknownCase(name.clone())),
            None => Ok(()),
        }
    }

    /// Executes one case and reports it the way a test framework would.
    fn execute_case(&self, case: &ScenarioCase, options: &RunOptions) -> CaseResult {
        let (outcome, detail) = if options.skip.contains(case.name.as_str()) {
            info!(case = %case.name, "case skipped");
            (RawOutcome::Skip, Some("skipped by request".to_string()))
        } else {
            match self.client.get(&case.request_path) {
                Ok(response) => match evaluate(case, &response) {
                    Ok(()) => (RawOutcome::Success, None),
                    Err(mismatch) => {
                        warn!(case = %case.name, detail = %mismatch.detail, "case failed");
                        (RawOutcome::Failure, Some(mismatch.detail))
                    }
                },
                Err(err) => {
                    warn!(case = %case.name, error = %err, "case request failed");
                    (RawOutcome::Failure, Some(err.to_string()))
                }
            }
        };
        CaseResult {
            method_name: method_name(case),
            parameters: case_parameters(case),
            outcome,
            detail,
        }
    }
}

/// Method identifier for the polarity of `case`.
fn method_name(case: &ScenarioCase) -> TestName {
    match case.polarity() {
        CasePolarity::Positive => TestName::from_catalog(POSITIVE_METHOD),
        CasePolarity::Negative => TestName::from_catalog(NEGATIVE_METHOD),
    }
}

/// Parameters in data-provider row order: name, path, expected value, text.
fn case_parameters(case: &ScenarioCase) -> Vec<CaseParameter> {
    let name = CaseParameter::Text(case.name.as_str().to_string());
    let path = CaseParameter::Text(case.request_path.clone());
    match &case.expectation {
        Expectation::Collection {
            count,
            ..
        } => vec![
            name,
            path,
            CaseParameter::Integer(i64::try_from(*count).unwrap_or(i64::MAX)),
            CaseParameter::Text(case.description.clone()),
        ],
        Expectation::Error {
            status,
            message_fragment,
        } => vec![
            name,
            path,
            CaseParameter::Integer(i64::from(*status)),
            CaseParameter::Text(message_fragment.clone()),
        ],
    }
}
