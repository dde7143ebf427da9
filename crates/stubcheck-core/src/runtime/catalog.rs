// crates/stubcheck-core/src/runtime/catalog.rs
// ============================================================================
// Module: Users Catalog
// Description: Fixed scenario cases and the stub rules that back them.
// Purpose: Keep the case table and the seed stubs side by side so they stay in step.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! The users catalog has three positive and three negative cases. The seed
//! list registers the generic `/users` rule first so every query-qualified
//! rule registered after it wins on recency; the forced-error rule also
//! carries priority 1 so it wins regardless of order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use crate::core::EntityCheck;
use crate::core::Expectation;
use crate::core::ScenarioCase;
use crate::core::ScenarioCatalog;
use crate::core::StubRule;
use crate::core::TestName;
use crate::core::UserFilter;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Path served by every stub in the catalog.
pub const USERS_PATH: &str = "/users";

/// User matched by the `age=30` scenario.
fn alice() -> Value {
    json!({ "id": 1, "name": "Alice", "age": 30, "gender": "female" })
}

/// User matched by the `gender=male` scenario.
fn bob() -> Value {
    json!({ "id": 2, "name": "Bob", "age": 25, "gender": "male" })
}

/// Error body shape returned by every negative stub.
fn error_body(message: &str, code: &str) -> Value {
    json!({ "message": message, "code": code })
}

// ============================================================================
// SECTION: Stub Rules
// ============================================================================

/// Seed rules for the users catalog, in registration order.
#[must_use]
pub fn users_stub_rules() -> Vec<StubRule> {
    vec![
        StubRule::get(USERS_PATH).responding_json(200, json!([alice(), bob()])),
        StubRule::get(USERS_PATH).with_query("age", "30").responding_json(200, json!([alice()])),
        StubRule::get(USERS_PATH).with_query("gender", "male").responding_json(200, json!([bob()])),
        StubRule::get(USERS_PATH)
            .with_query("age", "-1")
            .responding_json(400, error_body("Invalid age", "BAD_REQUEST")),
        StubRule::get(USERS_PATH)
            .with_query("gender", "unknown")
            .responding_json(422, error_body("Unsupported gender", "UNPROCESSABLE_ENTITY")),
        StubRule::get(USERS_PATH)
            .with_priority(1)
            .with_query("forceError", "true")
            .responding_json(500, error_body("Internal Server Error", "ISE")),
    ]
}

// ============================================================================
// SECTION: Scenario Cases
// ============================================================================

/// Builds a positive case expecting `count` users that pass `checks`.
fn positive(
    name: &'static str,
    path: &str,
    count: usize,
    checks: Vec<EntityCheck>,
    description: &str,
) -> ScenarioCase {
    ScenarioCase {
        name: TestName::from_catalog(name),
        request_path: path.to_string(),
        expectation: Expectation::Collection {
            count,
            checks,
        },
        description: description.to_string(),
    }
}

/// Builds a negative case expecting `status` and a message containing `fragment`.
fn negative(name: &'static str, path: &str, status: u16, fragment: &str) -> ScenarioCase {
    ScenarioCase {
        name: TestName::from_catalog(name),
        request_path: path.to_string(),
        expectation: Expectation::Error {
            status,
            message_fragment: fragment.to_string(),
        },
        description: format!("Should fail with {status} mentioning `{fragment}`"),
    }
}

/// Requires a user named `name` in the response.
fn includes(name: &str) -> EntityCheck {
    EntityCheck::Includes {
        name: name.to_string(),
    }
}

/// The standard users catalog.
///
/// [`SuiteRunner::setup`](crate::runtime::SuiteRunner::setup) validates it
/// before any case runs.
#[must_use]
pub fn standard_catalog() -> ScenarioCatalog {
    ScenarioCatalog {
        positive: vec![
            positive(
                "testGetAllUsers_Positive",
                "/users",
                2,
                vec![includes("Alice"), includes("Bob")],
                "Should return two users",
            ),
            positive(
                "testFilterByAge_Positive",
                "/users?age=30",
                1,
                vec![EntityCheck::Filtered {
                    name: "Alice".to_string(),
                    filter: UserFilter::Age(30),
                }],
                "Should return Alice only",
            ),
            positive(
                "testFilterByGender_Positive",
                "/users?gender=male",
                1,
                vec![EntityCheck::Filtered {
                    name: "Bob".to_string(),
                    filter: UserFilter::Gender("male".to_string()),
                }],
                "Should return Bob only",
            ),
        ],
        negative: vec![
            negative("testInvalidAge_Negative", "/users?age=-1", 400, "Invalid age"),
            negative(
                "testInvalidGender_Negative",
                "/users?gender=unknown",
                422,
                "Unsupported gender",
            ),
            negative(
                "testInternalServerError_Negative",
                "/users?forceError=true",
                500,
                "Internal Server Error",
            ),
        ],
    }
}
