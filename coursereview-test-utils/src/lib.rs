//! Course Review Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Fixtures for request bodies, backend rows, and auth users
//! - Proptest generators for methods, bodies, and workloads

pub use coursereview_core::{format_workload, RecordKey, Review, UpdateReviewRequest};

use serde_json::{json, Value};

/// Bearer token accepted by the mocked auth API.
pub const TEST_TOKEN: &str = "test-access-token";

/// Public key configured for the mocked backend.
pub const TEST_ANON_KEY: &str = "test-anon-key";

/// Revalidation secret configured in tests.
pub const TEST_ISR_SECRET: &str = "test-isr-secret";

/// `Authorization` header value carrying [`TEST_TOKEN`].
pub fn bearer_header() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// Update body for review `r1` of course `CS101`.
    pub fn update_body() -> Value {
        json!({
            "id": "r1",
            "course_id": "CS101",
            "semester": "Fall",
            "difficulty": 4,
            "workload": "10",
            "rating": 5,
            "comment": "great"
        })
    }

    /// Update body with a different workload.
    pub fn update_body_with_workload(workload: &str) -> Value {
        let mut body = update_body();
        body["workload"] = json!(workload);
        body
    }

    /// The row a backend returns after applying `body`.
    pub fn updated_row(body: &Value) -> Value {
        let mut row = body.clone();
        let workload = match &body["workload"] {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        row["workload"] = json!(format_workload(&workload));
        row["created_at"] = json!("2024-09-01T12:00:00+00:00");
        row
    }

    /// The auth API's answer for a resolved token.
    pub fn auth_user(id: &str) -> Value {
        json!({
            "id": id,
            "aud": "authenticated",
            "role": "authenticated",
            "email": "student@example.edu"
        })
    }

    /// The auth API's answer for a rejected token.
    pub fn auth_rejection(message: &str) -> Value {
        json!({ "code": 401, "msg": message })
    }

    /// The data API's answer for a rejected statement.
    pub fn data_rejection(message: &str) -> Value {
        json!({ "code": "PGRST116", "details": null, "hint": null, "message": message })
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for request inputs.

    use super::*;
    use proptest::prelude::*;

    /// Methods the update endpoint must refuse.
    pub fn arb_non_put_method() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("GET"),
            Just("POST"),
            Just("PATCH"),
            Just("DELETE"),
            Just("OPTIONS"),
            Just("TRACE"),
        ]
    }

    /// Workload text as a caller might type it.
    pub fn arb_workload() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..80).prop_map(|h| h.to_string()),
            (0u32..80, 1u32..10).prop_map(|(h, f)| format!("{}.{}", h, f)),
            "[0-9]{1,2}-[0-9]{1,2}",
            "[a-zA-Z0-9 ]{0,16}",
        ]
    }

    /// A complete, valid update body.
    pub fn arb_update_body() -> impl Strategy<Value = Value> {
        (
            "[a-z0-9]{1,8}",
            "[A-Z]{2,4}[0-9]{3}",
            prop_oneof![Just("Fall"), Just("Spring"), Just("Summer")],
            1u8..=5,
            arb_workload(),
            1u8..=5,
            ".{0,64}",
        )
            .prop_map(|(id, course_id, semester, difficulty, workload, rating, comment)| {
                json!({
                    "id": id,
                    "course_id": course_id,
                    "semester": semester,
                    "difficulty": difficulty,
                    "workload": workload,
                    "rating": rating,
                    "comment": comment
                })
            })
    }

    /// Raw request bodies: valid updates, other JSON, and non-JSON text.
    pub fn arb_request_body() -> impl Strategy<Value = Vec<u8>> {
        prop_oneof![
            arb_update_body().prop_map(|v| v.to_string().into_bytes()),
            Just(b"{}".to_vec()),
            Just(Vec::new()),
            ".{0,64}".prop_map(String::into_bytes),
            proptest::collection::vec(any::<u8>(), 0..64),
        ]
    }
}
