// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for stubcheck system-tests.
// Purpose: Provide the stub mock server, harness wiring, and artifact utilities.
// Dependencies: system-tests, stubcheck-core, stubcheck-http, stubcheck-store-sqlite
// ============================================================================

//! ## Overview
//! Shared helpers for stubcheck system-tests.
//! Invariants:
//! - Every suite owns its mock server and its store file.
//! - The stub server binds loopback only.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod harness;
pub mod mock_server_stub;
pub mod timeouts;
