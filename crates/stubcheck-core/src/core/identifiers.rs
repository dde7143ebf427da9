// crates/stubcheck-core/src/core/identifiers.rs
// ============================================================================
// Module: Stubcheck Identifiers
// Description: Test identity used as the persistence key.
// Purpose: Provide a non-empty, serializable test name with a stable wire form.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`TestName`] is the natural key for persisted results. It serializes as a
//! bare string and rejects empty or whitespace-only values at construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Test Name
// ============================================================================

/// Unique, stable identifier of a contract case.
///
/// # Invariants
/// - Never empty; surrounding whitespace is trimmed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TestName(String);

/// Errors raised when constructing a [`TestName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestNameError {
    /// The candidate name was empty after trimming.
    #[error("test name must not be empty")]
    Empty,
}

impl TestName {
    /// Creates a test name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TestNameError::Empty`] when nothing remains after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TestNameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TestNameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Builds a name from catalog data known to be non-empty.
    pub(crate) fn from_catalog(raw: &'static str) -> Self {
        Self(raw.to_string())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TestName {
    type Error = TestNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TestName> for String {
    fn from(value: TestName) -> Self {
        value.0
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
