// crates/stubcheck-core/src/runtime/matching.rs
// ============================================================================
// Module: Stub Resolution
// Description: Precedence rules between overlapping stub matchers.
// Purpose: Pick exactly one winning rule per request and reject seed orders that
//          would let a generic rule shadow a more specific one.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Resolution mirrors WireMock: among matching rules the lowest effective
//! priority wins, and equal priorities go to the rule registered last.
//! [`validate_registration_order`] checks a seed list against that rule
//! before anything is sent to the server.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Reverse;

use thiserror::Error;

use crate::core::ProbeRequest;
use crate::core::StubRule;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Priority assumed for rules without an explicit value.
pub const DEFAULT_STUB_PRIORITY: u32 = 5;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Returns the rule that answers `request`, if any.
///
/// `rules` must be in registration order.
#[must_use]
pub fn resolve<'a>(rules: &'a [StubRule], request: &ProbeRequest) -> Option<&'a StubRule> {
    rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.request.matches(request))
        .min_by_key(|(index, rule)| (rule.effective_priority(), Reverse(*index)))
        .map(|(_, rule)| rule)
}

// ============================================================================
// SECTION: Order Validation
// ============================================================================

/// Seed-order violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StubOrderError {
    /// A generic rule would answer requests meant for a more specific one.
    #[error(
        "stub #{generic_index} ({method} {path}) shadows more specific stub #{specific_index}"
    )]
    Shadowed {
        /// Registration index of the generic rule.
        generic_index: usize,
        /// Registration index of the shadowed specific rule.
        specific_index: usize,
        /// Shared method.
        method: String,
        /// Shared path.
        path: String,
    },
}

/// Checks that every strictly more specific rule beats the generic rules it overlaps.
///
/// # Errors
///
/// Returns [`StubOrderError::Shadowed`] for the first violating pair.
pub fn validate_registration_order(rules: &[StubRule]) -> Result<(), StubOrderError> {
    for (specific_index, specific) in rules.iter().enumerate() {
        for (generic_index, generic) in rules.iter().enumerate() {
            if !specific.request.is_strictly_more_specific_than(&generic.request) {
                continue;
            }
            let specific_key = (specific.effective_priority(), Reverse(specific_index));
            let generic_key = (generic.effective_priority(), Reverse(generic_index));
            if specific_key > generic_key {
                return Err(StubOrderError::Shadowed {
                    generic_index,
                    specific_index,
                    method: generic.request.method.to_string(),
                    path: generic.request.url_path.clone(),
                });
            }
        }
    }
    Ok(())
}
