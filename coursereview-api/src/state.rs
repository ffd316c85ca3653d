//! Shared application state for Axum routers.

use std::time::Instant;

use crate::backend::BackendClient;
use crate::revalidate::Revalidator;

/// Application-wide state shared across all routes.
///
/// Everything here is immutable after startup; clones share the same
/// connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Default backend handle. Scoped handles are derived from it per request.
    pub backend: BackendClient,
    pub revalidator: Revalidator,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(backend: BackendClient, revalidator: Revalidator) -> Self {
        Self {
            backend,
            revalidator,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(BackendClient, backend);
crate::impl_from_ref!(Revalidator, revalidator);
crate::impl_from_ref!(Instant, start_time);
