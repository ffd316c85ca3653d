//! Course Review Core - Entity Types
//!
//! Pure data structures shared by the service and its tests: review rows,
//! the update request, caller identity, and domain errors. No I/O lives here.

pub mod error;
pub mod identity;
pub mod review;

pub use error::{BackendError, ConfigError, RevalidationError};
pub use identity::{bearer_token, AuthUser};
pub use review::{
    format_workload, RecordKey, Review, ReviewChanges, UpdateReviewRequest, WORKLOAD_UNIT,
};
