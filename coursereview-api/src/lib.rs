//! Course Review API - REST Layer
//!
//! Axum service in front of a hosted backend (auth API plus PostgREST data
//! API). Its main endpoint lets an authenticated caller update a course
//! review; the backend's row-level policies decide what the caller may
//! change, and the front end is asked to revalidate the course page
//! afterwards.

pub mod backend;
pub mod config;
pub mod error;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod revalidate;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use backend::{BackendClient, BackendConfig, ScopedClient};
pub use config::{ApiConfig, Environment};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use revalidate::{RevalidationConfig, Revalidator};
pub use routes::create_api_router;
pub use state::AppState;
