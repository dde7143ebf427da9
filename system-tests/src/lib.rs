// system-tests/src/lib.rs
// ============================================================================
// Module: Stubcheck System Tests Library
// Description: Shared configuration and helpers for system test scenarios.
// Purpose: Provide common utilities for stubcheck system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the stubcheck system-tests
//! binaries in `system-tests/tests`. The suites run the contract harness
//! against a WireMock-compatible stub server bound to loopback, or against an
//! external mock server named by `STUBCHECK_SYSTEM_TEST_MOCK_URL`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
