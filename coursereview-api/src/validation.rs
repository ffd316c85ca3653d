//! Validation Traits
//!
//! Checks applied to request bodies after they deserialize.

use coursereview_core::{RecordKey, UpdateReviewRequest};

use crate::error::{ApiError, ApiResult};

/// Trait for validating non-empty values.
///
/// # Example
/// ```ignore
/// use coursereview_api::validation::ValidateNonEmpty;
///
/// fn check(course_id: &RecordKey) -> ApiResult<()> {
///     course_id.validate_non_empty("course_id")?;
///     Ok(())
/// }
/// ```
pub trait ValidateNonEmpty {
    /// Validate that the value is non-empty.
    ///
    /// # Errors
    /// Returns `ApiError::missing_field` if the value is empty or whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl ValidateNonEmpty for RecordKey {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.is_blank() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

/// Whole-request validation, run before any write.
pub trait Validate {
    fn validate(&self) -> ApiResult<()>;
}

impl Validate for UpdateReviewRequest {
    /// Keys must be present. Free-text columns may be empty.
    fn validate(&self) -> ApiResult<()> {
        self.id.validate_non_empty("id")?;
        self.course_id.validate_non_empty("course_id")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn request(id: serde_json::Value, course_id: serde_json::Value) -> UpdateReviewRequest {
        serde_json::from_value(json!({
            "id": id,
            "course_id": course_id,
            "semester": "",
            "difficulty": 1,
            "workload": "1",
            "rating": 1,
            "comment": ""
        }))
        .unwrap()
    }

    #[test]
    fn test_str_validation() {
        assert!("CS101".validate_non_empty("course_id").is_ok());
        let err = "  ".validate_non_empty("course_id").unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.message, "Required field 'course_id' is missing");
    }

    #[test]
    fn test_record_key_validation() {
        assert!(RecordKey::Int(0).validate_non_empty("id").is_ok());
        assert!(RecordKey::from("").validate_non_empty("id").is_err());
    }

    #[test]
    fn test_request_with_keys_is_valid() {
        assert!(request(json!("r1"), json!("CS101")).validate().is_ok());
        assert!(request(json!(1), json!(2)).validate().is_ok());
    }

    #[test]
    fn test_request_blank_keys_rejected() {
        let err = request(json!(""), json!("CS101")).validate().unwrap_err();
        assert_eq!(err.message, "Required field 'id' is missing");

        let err = request(json!("r1"), json!(" ")).validate().unwrap_err();
        assert_eq!(err.message, "Required field 'course_id' is missing");
    }
}
