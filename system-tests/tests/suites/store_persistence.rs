// system-tests/tests/suites/store_persistence.rs
// ============================================================================
// Module: Store Persistence Tests
// Description: End-to-end persistence validation for the SQLite result store.
// Purpose: Ensure reruns overwrite per-test rows and results survive reopening.
// Dependencies: system-tests helpers
// ============================================================================

//! `SQLite` result store persistence tests.

use std::fs;
use std::thread;

use serde_json::json;
use stubcheck_core::ResultRecord;
use stubcheck_core::StubRule;
use stubcheck_core::TestName;
use stubcheck_core::TestStatus;
use stubcheck_core::runtime::RunOptions;
use stubcheck_core::runtime::SuiteError;
use stubcheck_core::runtime::users_stub_rules;
use tempfile::TempDir;

use crate::helpers::artifacts::TestArtifacts;
use crate::helpers::harness::http_runner;
use crate::helpers::harness::http_runner_with_rules;
use crate::helpers::harness::store_at;
use crate::helpers::mock_server_stub::spawn_mock_server_stub;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn rerun_overwrites_rows_instead_of_appending() -> TestResult {
    let artifacts = TestArtifacts::for_test("rerun_overwrites_rows_instead_of_appending")?;
    let stub = spawn_mock_server_stub()?;
    let temp = TempDir::new()?;
    let store = store_at(&temp.path().join("test-results.db"))?;

    http_runner(stub.base_url(), &store)?.execute_suite(&RunOptions::default())?;
    let first = store.list()?;

    let mut rules = users_stub_rules();
    rules[2] = StubRule::get("/users")
        .with_query("gender", "male")
        .responding_json(200, json!([]));
    http_runner_with_rules(stub.base_url(), &store, rules)?.execute_suite(&RunOptions::default())?;
    let second = store.list()?;

    artifacts.write_json("first_run.json", &first)?;
    artifacts.write_json("second_run.json", &second)?;
    if first.len() != 6 || second.len() != 6 {
        let (first_len, second_len) = (first.len(), second.len());
        return Err(format!("expected 6 rows per run, got {first_len} then {second_len}").into());
    }
    let gender = TestName::new("testFilterByGender_Positive")?;
    let find = |records: &[ResultRecord]| {
        records.iter().find(|record| record.test_name == gender).cloned()
    };
    let before = find(&first).ok_or("missing first row")?;
    let after = find(&second).ok_or("missing second row")?;
    if before.status != TestStatus::Passed || after.status != TestStatus::Failed {
        let (was, now) = (before.status, after.status);
        return Err(format!("expected PASSED then FAILED, got {was} then {now}").into());
    }
    if after.execution_time < before.execution_time {
        return Err("execution time moved backwards on overwrite".into());
    }
    Ok(())
}

#[test]
fn results_survive_reopening_the_store() -> TestResult {
    let stub = spawn_mock_server_stub()?;
    let temp = TempDir::new()?;
    let path = temp.path().join("nested").join("test-results.db");
    {
        let store = store_at(&path)?;
        http_runner(stub.base_url(), &store)?.execute_suite(&RunOptions::default())?;
    }

    let reopened = store_at(&path)?;
    let counts = reopened.status_counts()?;

    if counts.passed != 6 || counts.total() != 6 {
        return Err(format!("unexpected counts after reopen: {counts}").into());
    }
    Ok(())
}

#[test]
fn unwritable_store_aborts_with_persistence_error() -> TestResult {
    let stub = spawn_mock_server_stub()?;
    let temp = TempDir::new()?;
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, b"file in the way")?;
    let store = store_at(&blocker.join("test-results.db"))?;
    let runner = http_runner(stub.base_url(), &store)?;

    let result = runner.execute_suite(&RunOptions::default());

    let Err(error) = result else {
        return Err("suite ran without a writable store".into());
    };
    if !matches!(error, SuiteError::Persistence(_)) || error.dependency() != "result store" {
        return Err(format!("expected result store failure, got {error}").into());
    }
    if !stub.served_requests().is_empty() {
        return Err("cases ran although the store could not be initialized".into());
    }
    Ok(())
}

#[test]
fn concurrent_runs_share_one_store() -> TestResult {
    let temp = TempDir::new()?;
    let path = temp.path().join("test-results.db");
    store_at(&path)?.initialize_schema()?;

    let mut handles = Vec::new();
    for _ in 0 .. 3 {
        let path = path.clone();
        handles.push(thread::spawn(move || -> Result<bool, String> {
            let stub = spawn_mock_server_stub()?;
            let store = store_at(&path)?;
            let report = http_runner(stub.base_url(), &store)?
                .execute_suite(&RunOptions::default())
                .map_err(|err| err.to_string())?;
            Ok(report.all_passed())
        }));
    }
    for handle in handles {
        let passed = handle.join().map_err(|_| "runner thread panicked")??;
        if !passed {
            return Err("a concurrent run reported failures".into());
        }
    }

    let records = store_at(&path)?.list()?;
    if records.len() != 6 {
        return Err(format!("expected 6 rows after concurrent runs, got {}", records.len()).into());
    }
    Ok(())
}
