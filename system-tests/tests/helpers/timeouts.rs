// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout configuration with env overrides.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Returns the effective timeout, honoring `STUBCHECK_SYSTEM_TEST_TIMEOUT_SEC` when set.
/// The override acts as a minimum to avoid shortening explicitly longer test timeouts.
#[must_use]
pub fn resolve_timeout(requested: Duration) -> Duration {
    match SystemTestConfig::load() {
        Ok(config) => config.timeout.map_or(requested, |timeout| requested.max(timeout)),
        Err(err) => panic!("system-test config invalid: {err}"),
    }
}

/// Returns the effective timeout in milliseconds for HTTP collaborators.
#[must_use]
pub fn resolve_timeout_ms(requested: Duration) -> u64 {
    u64::try_from(resolve_timeout(requested).as_millis()).unwrap_or(u64::MAX)
}
