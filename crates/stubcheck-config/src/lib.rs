// crates/stubcheck-config/src/lib.rs
// ============================================================================
// Module: Stubcheck Config
// Description: Configuration model and loader for the contract-test harness.
// Purpose: Resolve mock server and result store settings from layered sources.
// Dependencies: serde, toml, url, stubcheck-http, stubcheck-store-sqlite
// ============================================================================

//! ## Overview
//! [`HarnessConfig`] is resolved from, lowest precedence first: built-in
//! defaults, an optional TOML file, `STUBCHECK_*` environment variables, and
//! finally whatever the caller sets on the loaded value (CLI flags).
//! Loading is fail-closed: oversized, non-UTF-8, or unknown-key files are
//! rejected rather than partially applied.

pub mod config;

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::EnvOverrides;
pub use config::HarnessConfig;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::MOCK_BASE_URL_ENV_VAR;
pub use config::MockConfig;
pub use config::STORE_PATH_ENV_VAR;
pub use config::StoreConfig;
pub use config::TIMEOUT_ENV_VAR;
