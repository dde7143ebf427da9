// system-tests/src/config/env_tests.rs
// ============================================================================
// Module: System Test Env Unit Tests
// Description: Unit coverage for system-test settings parsing.
// Purpose: Ensure malformed settings are rejected and artifact folders resolve.
// Dependencies: tempfile
// ============================================================================

//! ## Overview
//! Settings are parsed from an in-memory map, so these tests never mutate the
//! process environment.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::SystemTestConfig;
use super::SystemTestEnv;

fn parse(vars: &[(SystemTestEnv, &str)]) -> Result<SystemTestConfig, String> {
    let map: HashMap<&str, String> =
        vars.iter().map(|(var, value)| (var.as_str(), (*value).to_string())).collect();
    SystemTestConfig::from_lookup(|name| Ok(map.get(name).cloned()))
}

#[test]
fn unset_environment_uses_stub_server_and_defaults() {
    let config = parse(&[]).unwrap();
    assert_eq!(config, SystemTestConfig::default());
}

#[test]
fn external_mock_url_is_accepted_when_http() {
    let config = parse(&[(SystemTestEnv::MockUrl, " http://127.0.0.1:8080 ")]).unwrap();
    assert_eq!(config.mock_url.as_deref(), Some("http://127.0.0.1:8080"));
}

#[test]
fn external_mock_url_must_be_http() {
    let err = parse(&[(SystemTestEnv::MockUrl, "ftp://127.0.0.1:8080")]).unwrap_err();
    assert!(err.starts_with("STUBCHECK_SYSTEM_TEST_MOCK_URL"), "{err}");
}

#[test]
fn timeout_floor_must_be_positive_seconds() {
    let config = parse(&[(SystemTestEnv::TimeoutSeconds, "30")]).unwrap();
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));

    for raw in ["0", "1.5", "-3"] {
        assert!(parse(&[(SystemTestEnv::TimeoutSeconds, raw)]).is_err(), "{raw}");
    }
}

#[test]
fn overwrite_flag_accepts_only_boolean_literals() {
    assert!(parse(&[(SystemTestEnv::AllowOverwrite, "TRUE")]).unwrap().allow_overwrite);
    assert!(!parse(&[(SystemTestEnv::AllowOverwrite, "0")]).unwrap().allow_overwrite);
    assert!(parse(&[(SystemTestEnv::AllowOverwrite, "yes")]).is_err());
}

#[test]
fn blank_values_name_their_variable() {
    for var in SystemTestEnv::ALL {
        let err = parse(&[(var, "  ")]).unwrap_err();
        assert!(err.contains(var.as_str()), "{err}");
    }
}

#[test]
fn lookup_failures_propagate() {
    let err = SystemTestConfig::from_lookup(|name| Err(format!("{name} must be valid UTF-8")))
        .unwrap_err();
    assert!(err.ends_with("must be valid UTF-8"));
}

#[test]
fn artifact_dir_defaults_to_stamped_run_folder() {
    let dir = SystemTestConfig::default().artifact_dir("rerun_overwrites", 42).unwrap();
    assert_eq!(dir, Path::new("target/system-tests/run_42/rerun_overwrites"));
}

#[test]
fn artifact_dir_under_run_root_refuses_reuse_unless_allowed() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("seed_case")).unwrap();
    let mut config = SystemTestConfig {
        run_root: Some(temp.path().to_path_buf()),
        ..SystemTestConfig::default()
    };

    assert_eq!(config.artifact_dir("fresh_case", 0).unwrap(), temp.path().join("fresh_case"));
    assert!(config.artifact_dir("seed_case", 0).is_err());

    config.allow_overwrite = true;
    assert_eq!(config.artifact_dir("seed_case", 0).unwrap(), temp.path().join("seed_case"));
}
