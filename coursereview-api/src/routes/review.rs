//! Review REST API Routes
//!
//! - `/api/update.review`: authenticated update of one review row, followed
//!   by revalidation of the course page. `PUT` only.
//! - `GET /api/courses/{course_id}/reviews`: public listing through the
//!   default backend handle.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    routing::{any, get},
    Json, Router,
};
use coursereview_core::{bearer_token, BackendError, RecordKey, UpdateReviewRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    backend::BackendClient,
    error::{ApiError, ApiResult, USER_NOT_FOUND},
    state::AppState,
    validation::Validate,
};

#[cfg(feature = "openapi")]
use crate::error::ErrorBody;
#[cfg(feature = "openapi")]
use coursereview_core::Review;

// ============================================================================
// TYPES
// ============================================================================

/// Successful update: the rows the backend reports as updated, unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateReviewResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Review>))]
    pub data: Vec<Value>,
}

/// Reviews of one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReviewListResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Review>))]
    pub data: Vec<Value>,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// `Authorization` value, or `None` when missing, empty, or not visible ASCII.
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Any failure to resolve the caller is a 401. The resolver's own message is
/// surfaced when it has one.
fn identity_error(err: BackendError) -> ApiError {
    tracing::warn!(error = %err, "Identity resolution failed");
    ApiError::unauthorized(err.caller_message().unwrap_or(USER_NOT_FOUND))
}

/// PUT /api/update.review - Update a review and revalidate its course page
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/api/update.review",
    tag = "Reviews",
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated and course page revalidated", body = UpdateReviewResponse),
        (status = 400, description = "Malformed or incomplete body", body = ErrorBody),
        (status = 401, description = "Missing or unresolvable credentials", body = ErrorBody),
        (status = 405, description = "Method other than PUT", body = ErrorBody),
        (status = 500, description = "Update or revalidation failed", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
))]
pub async fn update_review(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<UpdateReviewResponse>> {
    if method != Method::PUT {
        return Err(ApiError::method_not_allowed());
    }

    let authorization =
        authorization_header(&headers).ok_or_else(ApiError::missing_authorization)?;

    let scoped = state.backend.scoped(authorization);
    let token = bearer_token(authorization).ok_or_else(|| ApiError::unauthorized(USER_NOT_FOUND))?;
    let user = scoped.get_user(token).await.map_err(identity_error)?;

    let request: UpdateReviewRequest = serde_json::from_slice(&body)?;
    request.validate()?;

    let course_id = request.course_id.clone();
    let (review_id, changes) = request.into_changes();

    let rows = scoped.update_review(&review_id, &changes).await?;
    if rows.is_empty() {
        tracing::warn!(
            user_id = %user.id,
            review_id = %review_id,
            "Update matched no rows"
        );
    }

    if let Err(err) = state.revalidator.revalidate(&course_id).await {
        tracing::error!(
            user_id = %user.id,
            review_id = %review_id,
            course_id = %course_id,
            written = true,
            error = %err,
            "Review updated but course page revalidation failed"
        );
        return Err(err.into());
    }

    tracing::info!(
        user_id = %user.id,
        review_id = %review_id,
        course_id = %course_id,
        rows = rows.len(),
        "Review updated"
    );

    Ok(Json(UpdateReviewResponse { data: rows }))
}

/// GET /api/courses/{course_id}/reviews - List the reviews of a course
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/courses/{course_id}/reviews",
    tag = "Reviews",
    params(
        ("course_id" = String, Path, description = "Course identifier")
    ),
    responses(
        (status = 200, description = "Reviews of the course", body = ReviewListResponse),
        (status = 500, description = "Backend query failed", body = ErrorBody),
    ),
))]
pub async fn list_reviews(
    State(backend): State<BackendClient>,
    Path(course_id): Path<String>,
) -> ApiResult<Json<ReviewListResponse>> {
    let course_id = RecordKey::from(course_id);
    let data = backend.list_reviews(&course_id).await?;
    Ok(Json(ReviewListResponse { data }))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the review router.
///
/// The update route accepts every method so the handler answers 405 itself
/// with the JSON error body.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/update.review", any(update_review))
        .route("/courses/:course_id/reviews", get(list_reviews))
}
