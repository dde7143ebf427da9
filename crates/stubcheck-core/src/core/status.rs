// crates/stubcheck-core/src/core/status.rs
// ============================================================================
// Module: Stubcheck Status Model
// Description: Normalized test status and raw framework outcomes.
// Purpose: Give every completed case exactly one of four stored statuses.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`TestStatus`] is what the result store persists. [`RawOutcome`] is what a
//! test framework reports; classification lives in
//! [`crate::runtime::classify`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Test Status
// ============================================================================

/// Normalized status persisted for a test.
///
/// # Invariants
/// - Wire labels (`PASSED`, `FAILED`, `SKIPPED`, `UNKNOWN`) are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    /// The case completed and every expectation held.
    Passed,
    /// An expectation failed or the collaborator call errored.
    Failed,
    /// The case was explicitly skipped.
    Skipped,
    /// The framework reported an outcome with no defined mapping.
    Unknown,
}

impl TestStatus {
    /// All statuses in report order.
    pub const ALL: [Self; 4] = [Self::Passed, Self::Failed, Self::Skipped, Self::Unknown];

    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized test status label: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TestStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PASSED" => Ok(Self::Passed),
            "FAILED" => Ok(Self::Failed),
            "SKIPPED" => Ok(Self::Skipped),
            "UNKNOWN" => Ok(Self::Unknown),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Raw Outcomes
// ============================================================================

/// Raw outcome reported by a test framework for one case.
///
/// Integer codes follow the TestNG result constants so results produced by
/// an external runner can be fed through the same classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum RawOutcome {
    /// The case was created but never started.
    Created,
    /// The case finished without an assertion failure.
    Success,
    /// The case threw or an assertion failed.
    Failure,
    /// The case was skipped.
    Skip,
    /// A percentage-based success threshold was not met.
    SuccessPercentageFailure,
    /// The case started and never reported completion.
    Started,
    /// Any other framework code.
    Other(i32),
}

impl RawOutcome {
    /// Maps a TestNG-style result code onto a raw outcome.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Created,
            1 => Self::Success,
            2 => Self::Failure,
            3 => Self::Skip,
            4 => Self::SuccessPercentageFailure,
            16 => Self::Started,
            other => Self::Other(other),
        }
    }
}

// ============================================================================
// SECTION: Status Counts
// ============================================================================

/// PASSED/FAILED/SKIPPED/UNKNOWN breakdown for a run or a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Number of skipped cases.
    pub skipped: usize,
    /// Number of cases with an unknown outcome.
    pub unknown: usize,
}

impl StatusCounts {
    /// Adds one observation of `status`.
    pub const fn record(&mut self, status: TestStatus) {
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Skipped => self.skipped += 1,
            TestStatus::Unknown => self.unknown += 1,
        }
    }

    /// Returns the total number of observations.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.unknown
    }
}

impl FromIterator<TestStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = TestStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PASSED={} FAILED={} SKIPPED={} UNKNOWN={}",
            self.passed, self.failed, self.skipped, self.unknown
        )
    }
}
