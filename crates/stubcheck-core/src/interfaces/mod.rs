// crates/stubcheck-core/src/interfaces/mod.rs
// ============================================================================
// Module: Stubcheck Interfaces
// Description: Collaborator contracts for the mock admin API, the API under test, and storage.
// Purpose: Let the suite runner drive injected capabilities instead of globals.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The runner talks to three collaborators:
//! - [`MockAdmin`]: the mock server's administrative interface.
//! - [`ApiClient`]: the HTTP surface under test.
//! - [`ResultStore`]: durable, idempotent result persistence.
//!
//! Blanket implementations for `&T` let callers lend a collaborator to the
//! runner while keeping ownership for later inspection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::PayloadError;
use crate::core::ProbeResponse;
use crate::core::StubRule;
use crate::core::TestName;
use crate::core::TestStatus;

// ============================================================================
// SECTION: Result Store
// ============================================================================

/// Persistence errors raised by a [`ResultStore`].
///
/// Every variant is fatal for the calling run; results are never dropped silently.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing file could not be created, opened, or written.
    #[error("result store io error: {0}")]
    Io(String),
    /// The storage engine rejected an operation.
    #[error("result store error: {0}")]
    Store(String),
    /// The backing file or its contents are corrupt.
    #[error("result store corruption: {0}")]
    Corrupt(String),
    /// The store schema version is not supported.
    #[error("result store version mismatch: {0}")]
    VersionMismatch(String),
    /// The store configuration or an input was invalid.
    #[error("result store invalid input: {0}")]
    Invalid(String),
}

/// Durable, idempotent store of per-test outcomes.
pub trait ResultStore {
    /// Ensures the backing schema exists without touching existing rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be opened or initialized.
    fn initialize(&self) -> Result<(), StoreError>;

    /// Inserts or atomically replaces the record for `test_name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn upsert(&self, test_name: &TestName, status: TestStatus) -> Result<(), StoreError>;
}

impl<T: ResultStore + ?Sized> ResultStore for &T {
    fn initialize(&self) -> Result<(), StoreError> {
        (**self).initialize()
    }

    fn upsert(&self, test_name: &TestName, status: TestStatus) -> Result<(), StoreError> {
        (**self).upsert(test_name, status)
    }
}

// ============================================================================
// SECTION: Mock Admin
// ============================================================================

/// Errors raised by a mock server's administrative interface.
#[derive(Debug, Clone, Error)]
pub enum MockAdminError {
    /// The server did not acknowledge the request.
    #[error("mock server unavailable: {0}")]
    Unavailable(String),
    /// The server rejected a stub rule.
    #[error("mock server rejected stub (status {status}): {detail}")]
    StubRejected {
        /// Status returned by the server.
        status: u16,
        /// Response body or reason.
        detail: String,
    },
    /// The stub could not be encoded for transport.
    #[error("stub could not be encoded: {0}")]
    Encode(String),
}

/// Administrative interface of a mock HTTP server.
pub trait MockAdmin {
    /// Clears every registered stub.
    ///
    /// # Errors
    ///
    /// Returns [`MockAdminError::Unavailable`] when the server does not acknowledge.
    fn reset_all(&self) -> Result<(), MockAdminError>;

    /// Registers one stub rule.
    ///
    /// # Errors
    ///
    /// Returns [`MockAdminError`] when the server is unreachable or rejects the rule.
    fn add_stub(&self, rule: &StubRule) -> Result<(), MockAdminError>;
}

impl<T: MockAdmin + ?Sized> MockAdmin for &T {
    fn reset_all(&self) -> Result<(), MockAdminError> {
        (**self).reset_all()
    }

    fn add_stub(&self, rule: &StubRule) -> Result<(), MockAdminError> {
        (**self).add_stub(rule)
    }
}

// ============================================================================
// SECTION: API Client
// ============================================================================

/// Errors raised while calling the API under test.
#[derive(Debug, Clone, Error)]
pub enum ApiClientError {
    /// The request could not be sent or the body could not be read.
    #[error("api transport error: {0}")]
    Transport(String),
    /// The body did not match the shape implied by its status.
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// HTTP surface under test.
pub trait ApiClient {
    /// Issues `GET {path}` and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError`] on transport or decoding failures.
    fn get(&self, path: &str) -> Result<ProbeResponse, ApiClientError>;
}

impl<T: ApiClient + ?Sized> ApiClient for &T {
    fn get(&self, path: &str) -> Result<ProbeResponse, ApiClientError> {
        (**self).get(path)
    }
}
