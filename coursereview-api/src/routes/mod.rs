//! REST API Routes Module
//!
//! Includes:
//! - Review routes under /api
//! - Health check endpoints (Kubernetes-compatible)
//! - OpenAPI document at /openapi.json
//! - CORS support for the browser front end

pub mod health;
pub mod review;

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::state::AppState;

pub use health::create_router as health_router;
pub use review::create_router as review_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;

    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// # Middleware Order (outer to inner)
/// 1. Plain `OPTIONS` bypass - only real preflights reach CORS
/// 2. CORS - answers preflights, decorates cross-origin responses
/// 3. Trace - one span per request
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest("/api", review::create_router())
        .nest("/health", health::create_router());

    #[cfg(feature = "openapi")]
    {
        router = router.route("/openapi.json", axum::routing::get(openapi_json));
    }

    let app: Router = router.layer(TraceLayer::new_for_http()).with_state(state);

    app.clone()
        .layer(build_cors_layer(config))
        .layer(middleware::from_fn_with_state(app, bypass_cors_for_plain_options))
}

/// A CORS preflight is an `OPTIONS` request naming the method it intends to
/// use.
fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// The CORS layer answers every `OPTIONS` request itself. Anything that is
/// not a preflight goes straight to the routes instead, where it is handled
/// like any other method.
async fn bypass_cors_for_plain_options(
    State(app): State<Router>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::OPTIONS || is_preflight(&request) {
        return next.run(request).await;
    }

    match app.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}
