// crates/stubcheck-core/src/runtime/classify.rs
// ============================================================================
// Module: Outcome Classification
// Description: Total mapping from raw framework outcomes to stored statuses.
// Purpose: Normalize every raw outcome to exactly one of four statuses.
// Dependencies: crate::core
// ============================================================================

//! Total mapping from raw framework outcomes to stored statuses.

use crate::core::RawOutcome;
use crate::core::TestStatus;

/// Maps a raw outcome to the status persisted for it.
///
/// Unanticipated outcomes map to [`TestStatus::Unknown`] rather than failing.
#[must_use]
pub const fn classify(outcome: RawOutcome) -> TestStatus {
    match outcome {
        RawOutcome::Success => TestStatus::Passed,
        RawOutcome::Failure | RawOutcome::SuccessPercentageFailure => TestStatus::Failed,
        RawOutcome::Skip => TestStatus::Skipped,
        RawOutcome::Created | RawOutcome::Started | RawOutcome::Other(_) => TestStatus::Unknown,
    }
}
