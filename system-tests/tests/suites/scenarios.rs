// system-tests/tests/suites/scenarios.rs
// ============================================================================
// Module: Contract Scenario Tests
// Description: End-to-end runs of the users catalog over HTTP.
// Purpose: Prove every contract scenario holds against a seeded mock server.
// Dependencies: system-tests helpers
// ============================================================================

//! Contract scenario tests against a WireMock-compatible server.

use serde_json::json;
use stubcheck_core::ApiClient;
use stubcheck_core::ApiPayload;
use stubcheck_core::ProbeResponse;
use stubcheck_core::StubRule;
use stubcheck_core::TestName;
use stubcheck_core::TestStatus;
use stubcheck_core::User;
use stubcheck_core::runtime::MockConfigurator;
use stubcheck_core::runtime::RunOptions;
use stubcheck_core::runtime::users_stub_rules;
use tempfile::TempDir;

use crate::helpers::artifacts::TestArtifacts;
use crate::helpers::harness::http_collaborators;
use crate::helpers::harness::http_runner;
use crate::helpers::harness::http_runner_with_rules;
use crate::helpers::harness::mock_target;
use crate::helpers::harness::store_at;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn users(response: &ProbeResponse) -> Result<&[User], String> {
    match &response.payload {
        ApiPayload::Users(users) => Ok(users),
        ApiPayload::Error(error) => Err(format!(
            "expected users, got error body {}",
            error.message.as_deref().unwrap_or("<none>")
        )),
    }
}

fn error_message(response: &ProbeResponse) -> Result<String, String> {
    match &response.payload {
        ApiPayload::Error(error) => Ok(error.message.clone().unwrap_or_default()),
        ApiPayload::Users(users) => Err(format!("expected error body, got {} users", users.len())),
    }
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|user| user.name.as_str()).collect()
}

// ============================================================================
// SECTION: Full Runs
// ============================================================================

#[test]
fn standard_catalog_passes_and_is_persisted() -> TestResult {
    let artifacts = TestArtifacts::for_test("standard_catalog_passes_and_is_persisted")?;
    let target = mock_target()?;
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;
    let runner = http_runner(target.base_url(), &store)?;

    let report = runner.execute_suite(&RunOptions::default())?;

    artifacts.write_json("suite_report.json", &report)?;
    if !report.all_passed() || report.outcomes.len() != 6 {
        return Err(format!("expected 6 passing cases, got {}", report.counts()).into());
    }
    let records = store.list()?;
    if records.len() != 6 || records.iter().any(|record| record.status != TestStatus::Passed) {
        return Err(format!("expected 6 PASSED rows, got {}", records.len()).into());
    }
    artifacts.write_json("stored_results.json", &records)?;
    Ok(())
}

#[test]
fn drifted_stub_fails_only_its_case() -> TestResult {
    let artifacts = TestArtifacts::for_test("drifted_stub_fails_only_its_case")?;
    let target = mock_target()?;
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;
    let mut rules = users_stub_rules();
    rules[1] = StubRule::get("/users")
        .with_query("age", "30")
        .responding_json(200, json!([{ "id": 2, "name": "Bob", "age": 25, "gender": "male" }]));
    let runner = http_runner_with_rules(target.base_url(), &store, rules)?;

    let report = runner.execute_suite(&RunOptions::default())?;

    artifacts.write_json("suite_report.json", &report)?;
    let counts = report.counts();
    if report.all_passed() || counts.failed != 1 || counts.passed != 5 {
        return Err(format!("expected exactly one failure, got {counts}").into());
    }
    let drifted = store
        .get(&TestName::new("testFilterByAge_Positive")?)?
        .ok_or("missing record for testFilterByAge_Positive")?;
    if drifted.status != TestStatus::Failed {
        return Err(format!("expected FAILED, got {}", drifted.status).into());
    }
    Ok(())
}

#[test]
fn skipped_cases_are_recorded_without_requests() -> TestResult {
    let target = mock_target()?;
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;
    let runner = http_runner(target.base_url(), &store)?;

    let options = RunOptions::skipping(["testInvalidGender_Negative"]);
    let report = runner.execute_suite(&options)?;

    let counts = report.counts();
    if counts.skipped != 1 || counts.passed != 5 || !report.all_passed() {
        return Err(format!("unexpected counts {counts}").into());
    }
    if let Some(stub) = target.stub() {
        let served = stub.served_requests();
        if served.iter().any(|request| request.contains("gender=unknown")) {
            return Err("skipped case still issued its request".into());
        }
        if served.len() != 5 {
            return Err(format!("expected 5 served requests, got {}", served.len()).into());
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Individual Scenarios
// ============================================================================

#[test]
fn seeded_server_answers_each_contract_scenario() -> TestResult {
    let target = mock_target()?;
    let (admin, client) = http_collaborators(target.base_url())?;
    MockConfigurator::new(admin).reset_and_seed()?;

    let all = client.get("/users")?;
    if all.status != 200 || names(users(&all)?) != ["Alice", "Bob"] {
        return Err("GET /users did not return Alice and Bob".into());
    }

    let by_age = client.get("/users?age=30")?;
    let by_age_users = users(&by_age)?;
    if by_age_users.len() != 1 || by_age_users[0].name != "Alice" || by_age_users[0].age != 30 {
        return Err("GET /users?age=30 did not return Alice only".into());
    }

    let by_gender = client.get("/users?gender=male")?;
    let by_gender_users = users(&by_gender)?;
    if by_gender_users.len() != 1 || by_gender_users[0].gender != "male" {
        return Err("GET /users?gender=male did not return Bob only".into());
    }

    let invalid_age = client.get("/users?age=-1")?;
    if invalid_age.status != 400 || !error_message(&invalid_age)?.contains("Invalid age") {
        return Err(format!("GET /users?age=-1 returned {}", invalid_age.status).into());
    }

    let invalid_gender = client.get("/users?gender=unknown")?;
    if invalid_gender.status != 422
        || !error_message(&invalid_gender)?.contains("Unsupported gender")
    {
        return Err(format!("GET /users?gender=unknown returned {}", invalid_gender.status).into());
    }

    let forced = client.get("/users?forceError=true")?;
    if forced.status != 500 || !error_message(&forced)?.contains("Internal Server Error") {
        return Err(format!("GET /users?forceError=true returned {}", forced.status).into());
    }

    Ok(())
}

#[test]
fn specific_stub_wins_over_generic_match() -> TestResult {
    let target = mock_target()?;
    let (admin, client) = http_collaborators(target.base_url())?;
    MockConfigurator::new(admin).reset_and_seed()?;

    let combined = client.get("/users?age=30&forceError=true")?;
    if combined.status != 500 {
        return Err(format!("priority 1 rule lost to a default rule: {}", combined.status).into());
    }
    let extra_param = client.get("/users?age=30&page=2")?;
    if extra_param.status != 200 || names(users(&extra_param)?) != ["Alice"] {
        return Err("extra query parameter prevented the age=30 match".into());
    }
    let non_matching_value = client.get("/users?forceError=false")?;
    if non_matching_value.status != 200 || users(&non_matching_value)?.len() != 2 {
        return Err("forceError=false should fall back to the generic rule".into());
    }

    Ok(())
}
