// crates/stubcheck-core/src/runtime/configurator.rs
// ============================================================================
// Module: Mock Configurator
// Description: Stub lifecycle on a mock server reached through `MockAdmin`.
// Purpose: Bring the mock server into a known, fully specified state before a suite runs.
// Dependencies: crate::core, crate::interfaces, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`MockConfigurator`] owns a [`MockAdmin`] capability and exposes the three
//! lifecycle operations: reset, register one stub, and seed the catalog.
//! Seed lists are checked with [`validate_registration_order`] before the
//! first rule leaves the process, so a misordered list never leaves the
//! server half seeded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing::debug;
use tracing::info;

use crate::core::StubRule;
use crate::interfaces::MockAdmin;
use crate::interfaces::MockAdminError;
use crate::runtime::catalog::users_stub_rules;
use crate::runtime::matching::StubOrderError;
use crate::runtime::matching::validate_registration_order;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while seeding stub rules.
#[derive(Debug, Clone, Error)]
pub enum SeedError {
    /// The seed list would let a generic rule shadow a specific one.
    #[error(transparent)]
    Order(#[from] StubOrderError),
    /// The mock server was unreachable or rejected a rule.
    #[error(transparent)]
    Admin(#[from] MockAdminError),
}

// ============================================================================
// SECTION: Configurator
// ============================================================================

/// Stub lifecycle handle over an injected mock admin capability.
#[derive(Debug, Clone)]
pub struct MockConfigurator<A> {
    /// Admin capability of the mock server being configured.
    admin: A,
}

impl<A: MockAdmin> MockConfigurator<A> {
    /// Wraps a mock admin capability.
    #[must_use]
    pub const fn new(admin: A) -> Self {
        Self {
            admin,
        }
    }

    /// Returns the wrapped capability.
    #[must_use]
    pub const fn admin(&self) -> &A {
        &self.admin
    }

    /// Clears every stub registered on the server.
    ///
    /// # Errors
    ///
    /// Returns [`MockAdminError::Unavailable`] when the server does not acknowledge.
    pub fn reset_all(&self) -> Result<(), MockAdminError> {
        self.admin.reset_all()?;
        info!("mock server stubs reset");
        Ok(())
    }

    /// Registers one stub rule.
    ///
    /// # Errors
    ///
    /// Returns [`MockAdminError`] when the rule is not accepted.
    pub fn add_stub(&self, rule: &StubRule) -> Result<(), MockAdminError> {
        self.admin.add_stub(rule)?;
        debug!(
            method = %rule.request.method,
            path = %rule.request.url_path,
            priority = rule.effective_priority(),
            status = rule.response.status,
            "stub registered"
        );
        Ok(())
    }

    /// Validates `rules` as a registration sequence, then registers them in order.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Order`] before any request is sent when the order is
    /// invalid, or [`SeedError::Admin`] for the first rule the server refuses.
    pub fn seed_rules(&self, rules: &[StubRule]) -> Result<(), SeedError> {
        validate_registration_order(rules)?;
        for rule in rules {
            self.add_stub(rule)?;
        }
        info!(stubs = rules.len(), "stub catalog seeded");
        Ok(())
    }

    /// Registers the users stub catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] as for [`Self::seed_rules`].
    pub fn seed_catalog(&self) -> Result<(), SeedError> {
        self.seed_rules(&users_stub_rules())
    }

    /// Resets the server, then seeds the users stub catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when either step fails.
    pub fn reset_and_seed(&self) -> Result<(), SeedError> {
        self.reset_all()?;
        self.seed_catalog()
    }

    /// Consumes the configurator and returns the capability.
    #[must_use]
    pub fn into_inner(self) -> A {
        self.admin
    }
}
