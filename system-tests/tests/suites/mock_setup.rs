// system-tests/tests/suites/mock_setup.rs
// ============================================================================
// Module: Mock Setup Tests
// Description: Mock server lifecycle through the WireMock admin API.
// Purpose: Ensure setup resets, seeds in order, and fails closed before any case runs.
// Dependencies: system-tests helpers
// ============================================================================

//! Mock server setup tests against the in-process stub server.

use stubcheck_core::StubRule;
use stubcheck_core::runtime::RunOptions;
use stubcheck_core::runtime::SuiteError;
use stubcheck_core::runtime::users_stub_rules;
use tempfile::TempDir;

use crate::helpers::artifacts::TestArtifacts;
use crate::helpers::harness::http_runner;
use crate::helpers::harness::http_runner_with_rules;
use crate::helpers::harness::store_at;
use crate::helpers::harness::unreachable_base_url;
use crate::helpers::mock_server_stub::AdminCall;
use crate::helpers::mock_server_stub::AdminFault;
use crate::helpers::mock_server_stub::spawn_mock_server_stub;

type TestResult = Result<(), Box<dyn std::error::Error>>;

// ============================================================================
// SECTION: Seeding
// ============================================================================

#[test]
fn setup_resets_then_registers_rules_in_order() -> TestResult {
    let artifacts = TestArtifacts::for_test("setup_resets_then_registers_rules_in_order")?;
    let stub = spawn_mock_server_stub()?;
    stub.preload(StubRule::get("/stale").responding_json(200, serde_json::json!([])));
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;
    let runner = http_runner(stub.base_url(), &store)?;

    runner.setup()?;

    let calls = stub.admin_calls();
    artifacts.write_json("admin_calls.json", &calls)?;
    if calls.first() != Some(&AdminCall::Reset) {
        return Err("first admin call was not a reset".into());
    }
    let mappings = calls.iter().filter(|call| matches!(call, AdminCall::AddMapping(_))).count();
    if mappings != 6 || calls.len() != 7 {
        return Err(format!("expected reset plus 6 mappings, got {} calls", calls.len()).into());
    }
    if stub.rules() != users_stub_rules() {
        return Err("registered rules differ from the seed list".into());
    }
    Ok(())
}

#[test]
fn repeated_setup_does_not_duplicate_rules() -> TestResult {
    let stub = spawn_mock_server_stub()?;
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;
    let runner = http_runner(stub.base_url(), &store)?;

    runner.setup()?;
    runner.setup()?;

    if stub.rules().len() != 6 {
        return Err(format!("expected 6 rules after two setups, got {}", stub.rules().len()).into());
    }
    Ok(())
}

// ============================================================================
// SECTION: Fail-Closed Setup
// ============================================================================

#[test]
fn failed_reset_aborts_before_any_case() -> TestResult {
    let stub = spawn_mock_server_stub()?;
    stub.set_fault(AdminFault::ResetFails);
    let temp = TempDir::new()?;
    let store_path = temp.path().join("test-results.db");
    let store = store_at(&store_path)?;
    let runner = http_runner(stub.base_url(), &store)?;

    let result = runner.execute_suite(&RunOptions::default());

    match result {
        Err(SuiteError::MockServerUnavailable(_)) => {}
        Err(other) => return Err(format!("expected mock server unavailable, got {other}").into()),
        Ok(_) => return Err("suite ran despite a failed reset".into()),
    }
    if !stub.served_requests().is_empty() || store_path.exists() {
        return Err("cases ran or results were written after a failed reset".into());
    }
    Ok(())
}

#[test]
fn rejected_mapping_aborts_before_any_case() -> TestResult {
    let stub = spawn_mock_server_stub()?;
    stub.set_fault(AdminFault::RejectAfter(3));
    let temp = TempDir::new()?;
    let store_path = temp.path().join("test-results.db");
    let store = store_at(&store_path)?;
    let runner = http_runner(stub.base_url(), &store)?;

    let result = runner.execute_suite(&RunOptions::default());

    let Err(error) = result else {
        return Err("suite ran despite a rejected mapping".into());
    };
    if !matches!(error, SuiteError::StubRegistration(_)) || error.dependency() != "mock server" {
        return Err(format!("expected stub registration failure, got {error}").into());
    }
    if !error.to_string().contains("422") {
        return Err(format!("rejection status missing from error: {error}").into());
    }
    if stub.rules().len() != 3 || !stub.served_requests().is_empty() || store_path.exists() {
        return Err("suite continued after a rejected mapping".into());
    }
    Ok(())
}

#[test]
fn unreachable_mock_server_is_reported_as_unavailable() -> TestResult {
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;
    let runner = http_runner(&unreachable_base_url()?, &store)?;

    let result = runner.setup();

    let Err(error) = result else {
        return Err("setup succeeded without a mock server".into());
    };
    if !matches!(error, SuiteError::MockServerUnavailable(_)) {
        return Err(format!("expected mock server unavailable, got {error}").into());
    }
    Ok(())
}

#[test]
fn misordered_seed_list_is_rejected_before_registration() -> TestResult {
    let stub = spawn_mock_server_stub()?;
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;
    let mut rules = users_stub_rules();
    let generic = rules.remove(0);
    rules.push(generic);
    let runner = http_runner_with_rules(stub.base_url(), &store, rules)?;

    let result = runner.setup();

    if !matches!(result, Err(SuiteError::StubOrder(_))) {
        return Err("generic rule registered last was not rejected".into());
    }
    if stub.admin_calls().iter().any(|call| matches!(call, AdminCall::AddMapping(_))) {
        return Err("mappings were sent despite an invalid order".into());
    }
    Ok(())
}
