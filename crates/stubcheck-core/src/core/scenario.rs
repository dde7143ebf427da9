// crates/stubcheck-core/src/core/scenario.rs
// ============================================================================
// Module: Stubcheck Scenario Model
// Description: Named contract cases and their expected outcomes.
// Purpose: Describe positive and negative cases as static, read-only data.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ScenarioCase`] pairs a request path with an [`Expectation`]. Positive
//! cases expect a user collection of a given size plus optional entity
//! checks; negative cases expect an exact status and a message fragment.
//! [`ScenarioCatalog`] keeps the two kinds in disjoint ordered lists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::TestName;
use crate::core::payload::User;

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// Field filter a positive case applies to every returned entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum UserFilter {
    /// Entity age must equal the value.
    Age(u32),
    /// Entity gender must equal the value.
    Gender(String),
}

impl UserFilter {
    /// Returns true when `user` satisfies the filter.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Age(age) => user.age == *age,
            Self::Gender(gender) => user.gender == *gender,
        }
    }
}

impl fmt::Display for UserFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Age(age) => write!(f, "age={age}"),
            Self::Gender(gender) => write!(f, "gender={gender}"),
        }
    }
}

/// Membership check applied to a returned collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityCheck {
    /// Some entity carries `name`.
    Includes {
        /// Required entity name.
        name: String,
    },
    /// The first entity carries `name` and every entity satisfies `filter`.
    Filtered {
        /// Required name of the first entity.
        name: String,
        /// Filter each entity must satisfy.
        filter: UserFilter,
    },
}

/// Expected outcome of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    /// `200` with exactly `count` entities passing every check.
    Collection {
        /// Exact collection size.
        count: usize,
        /// Additional membership checks.
        checks: Vec<EntityCheck>,
    },
    /// Exact non-2xx status with an error message containing `message_fragment`.
    Error {
        /// Expected status code.
        status: u16,
        /// Substring the error message must contain.
        message_fragment: String,
    },
}

/// Whether a case exercises the success or the failure path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePolarity {
    /// Expects a 2xx collection.
    Positive,
    /// Expects an error status.
    Negative,
}

// ============================================================================
// SECTION: Scenario Case
// ============================================================================

/// One named contract case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioCase {
    /// Unique case name; the persistence key.
    pub name: TestName,
    /// Request path including the query string.
    pub request_path: String,
    /// Expected outcome.
    pub expectation: Expectation,
    /// Human-readable intent.
    pub description: String,
}

impl ScenarioCase {
    /// Returns the polarity implied by the expectation.
    #[must_use]
    pub const fn polarity(&self) -> CasePolarity {
        match self.expectation {
            Expectation::Collection {
                ..
            } => CasePolarity::Positive,
            Expectation::Error {
                ..
            } => CasePolarity::Negative,
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two cases share a name.
    #[error("duplicate scenario name: {0}")]
    DuplicateName(TestName),
    /// A case sits in the list that does not match its expectation.
    #[error("scenario {0} is filed under the wrong polarity")]
    WrongPolarity(TestName),
}

/// Fixed, ordered catalog of positive and negative cases.
///
/// # Invariants
/// - Names are unique across both lists.
/// - `positive` holds only collection expectations; `negative` only error expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    /// Cases expecting a 2xx collection.
    pub positive: Vec<ScenarioCase>,
    /// Cases expecting an error status.
    pub negative: Vec<ScenarioCase>,
}

impl ScenarioCatalog {
    /// Builds a catalog after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on duplicate names or misfiled cases.
    pub fn new(
        positive: Vec<ScenarioCase>,
        negative: Vec<ScenarioCase>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            positive,
            negative,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks name uniqueness and polarity placement.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on the first violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = BTreeSet::new();
        for case in &self.positive {
            if case.polarity() != CasePolarity::Positive {
                return Err(CatalogError::WrongPolarity(case.name.clone()));
            }
        }
        for case in &self.negative {
            if case.polarity() != CasePolarity::Negative {
                return Err(CatalogError::WrongPolarity(case.name.clone()));
            }
        }
        for case in self.cases() {
            if !seen.insert(case.name.as_str()) {
                return Err(CatalogError::DuplicateName(case.name.clone()));
            }
        }
        Ok(())
    }

    /// Iterates positive cases, then negative cases.
    pub fn cases(&self) -> impl Iterator<Item = &ScenarioCase> {
        self.positive.iter().chain(self.negative.iter())
    }

    /// Returns true when a case is named `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cases().any(|case| case.name.as_str() == name)
    }

    /// Returns the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    /// Returns true when the catalog holds no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}
