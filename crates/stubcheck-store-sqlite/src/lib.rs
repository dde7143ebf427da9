// crates/stubcheck-store-sqlite/src/lib.rs
// ============================================================================
// Module: Stubcheck SQLite Store
// Description: SQLite-backed ResultStore for contract outcomes.
// Purpose: Persist one row per test name across suite runs.
// Dependencies: stubcheck-core, rusqlite
// ============================================================================

//! ## Overview
//! `stubcheck-store-sqlite` provides [`SqliteResultStore`], the durable
//! implementation of [`stubcheck_core::ResultStore`], plus read helpers used
//! for reporting.

pub mod store;

pub use store::DEFAULT_BUSY_TIMEOUT_MS;
pub use store::DEFAULT_STORE_PATH;
pub use store::SqliteResultStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
