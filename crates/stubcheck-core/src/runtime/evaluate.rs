// crates/stubcheck-core/src/runtime/evaluate.rs
// ============================================================================
// Module: Case Evaluation
// Description: Compares a decoded probe response against a case expectation.
// Purpose: Produce a local, recoverable mismatch instead of aborting the suite.
// Dependencies: crate::core, thiserror
// ============================================================================

//! Compares a decoded probe response against a case expectation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ApiPayload;
use crate::core::EntityCheck;
use crate::core::Expectation;
use crate::core::ProbeResponse;
use crate::core::ScenarioCase;
use crate::core::TestName;
use crate::core::User;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// An expectation of a single case was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{case}: {detail}")]
pub struct AssertionMismatch {
    /// Case whose expectation failed.
    pub case: TestName,
    /// What was expected and what was observed.
    pub detail: String,
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Checks `response` against the expectation of `case`.
///
/// # Errors
///
/// Returns [`AssertionMismatch`] describing the first unmet expectation.
pub fn evaluate(case: &ScenarioCase, response: &ProbeResponse) -> Result<(), AssertionMismatch> {
    let mismatch = |detail: String| AssertionMismatch {
        case: case.name.clone(),
        detail,
    };
    match &case.expectation {
        Expectation::Collection {
            count,
            checks,
        } => {
            if response.status != 200 {
                return Err(mismatch(format!("expected status 200 but was {}", response.status)));
            }
            let ApiPayload::Users(users) = &response.payload else {
                return Err(mismatch("expected a user list but got an error body".to_string()));
            };
            if users.len() != *count {
                return Err(mismatch(format!(
                    "{}: expected {count} users but got {}",
                    case.description,
                    users.len()
                )));
            }
            checks.iter().try_for_each(|check| check_entities(check, users).map_err(mismatch))
        }
        Expectation::Error {
            status,
            message_fragment,
        } => {
            if response.status != *status {
                return Err(mismatch(format!(
                    "expected status {status} but was {}",
                    response.status
                )));
            }
            let ApiPayload::Error(error) = &response.payload else {
                return Err(mismatch("expected an error body but got a user list".to_string()));
            };
            match error.message.as_deref() {
                Some(message) if message.contains(message_fragment.as_str()) => Ok(()),
                Some(message) => Err(mismatch(format!(
                    "Expected message to contain: {message_fragment} but was: {message}"
                ))),
                None => Err(mismatch(format!(
                    "Expected message to contain: {message_fragment} but was: null"
                ))),
            }
        }
    }
}

/// Applies one membership check.
fn check_entities(check: &EntityCheck, users: &[User]) -> Result<(), String> {
    match check {
        EntityCheck::Includes {
            name,
        } => {
            if users.iter().any(|user| user.name == *name) {
                Ok(())
            } else {
                Err(format!("expected an entity named {name}"))
            }
        }
        EntityCheck::Filtered {
            name,
            filter,
        } => {
            let Some(first) = users.first() else {
                return Err(format!("expected first entity {name} but the list was empty"));
            };
            if first.name != *name {
                return Err(format!("expected first entity {name} but was {}", first.name));
            }
            match users.iter().find(|user| !filter.matches(user)) {
                Some(user) => Err(format!("entity {} does not satisfy filter {filter}", user.name)),
                None => Ok(()),
            }
        }
    }
}
