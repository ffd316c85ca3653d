//! OpenAPI Specification for the Course Review API
//!
//! Generated with utoipa from the route annotations and schema derives.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use coursereview_core::{RecordKey, Review, UpdateReviewRequest};

use crate::error::ErrorBody;
use crate::routes::health::{self, Liveness, Readiness};
use crate::routes::review::{self, ReviewListResponse, UpdateReviewResponse};

/// OpenAPI document for the Course Review API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Course Review API",
        version = "0.1.0",
        description = "Authenticated course review updates with on-demand page revalidation",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3001", description = "Local Development")
    ),
    tags(
        (name = "Reviews", description = "Course reviews"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        review::update_review,
        review::list_reviews,
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        RecordKey,
        Review,
        UpdateReviewRequest,
        UpdateReviewResponse,
        ReviewListResponse,
        ErrorBody,
        Liveness,
        Readiness,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier for OpenAPI document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token issued by the backend's auth API"))
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
