//! Review records and the update request that mutates them

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Unit appended to every persisted workload value.
pub const WORKLOAD_UNIT: &str = "hrs/wk";

/// Render a caller-supplied workload in its persisted form.
///
/// The unit is appended unconditionally, so an already-suffixed value is
/// suffixed again.
pub fn format_workload(workload: &str) -> String {
    format!("{} {}", workload, WORKLOAD_UNIT)
}

// ============================================================================
// RECORD KEYS
// ============================================================================

/// Primary or foreign key of a backend row.
///
/// Tables may key rows by integer or by text; the JSON form the caller
/// used is kept so it round-trips unchanged to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum RecordKey {
    Int(i64),
    Text(String),
}

impl RecordKey {
    /// True for an empty or whitespace-only text key.
    pub fn is_blank(&self) -> bool {
        match self {
            RecordKey::Int(_) => false,
            RecordKey::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Int(value) => write!(f, "{}", value),
            RecordKey::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        RecordKey::Text(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        RecordKey::Text(value)
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        RecordKey::Int(value)
    }
}

// ============================================================================
// UPDATE REQUEST
// ============================================================================

/// Body of an update-review request.
///
/// Every field is required. `workload` may arrive as a JSON string or
/// number and is carried as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateReviewRequest {
    /// Review to update
    pub id: RecordKey,
    /// Course the review belongs to
    pub course_id: RecordKey,
    /// Semester label, e.g. "Fall 2024"
    pub semester: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub difficulty: Number,
    /// Hours per week, without unit
    #[serde(deserialize_with = "text_or_number")]
    pub workload: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub rating: Number,
    pub comment: String,
}

impl UpdateReviewRequest {
    /// Split the request into the row key and the column values to write.
    pub fn into_changes(self) -> (RecordKey, ReviewChanges) {
        let changes = ReviewChanges {
            course_id: self.course_id,
            semester: self.semester,
            difficulty: self.difficulty,
            workload: format_workload(&self.workload),
            rating: self.rating,
            comment: self.comment,
        };
        (self.id, changes)
    }
}

/// Column values written by an update. The key itself is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewChanges {
    pub course_id: RecordKey,
    pub semester: String,
    pub difficulty: Number,
    pub workload: String,
    pub rating: Number,
    pub comment: String,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number_text(&number)),
        other => Err(serde::de::Error::custom(format!(
            "invalid type: {}, expected a string or number",
            json_kind(&other)
        ))),
    }
}

/// Text of a numeric workload. Integral floats drop their fraction, so `10.0`
/// and `1e1` are written as `10` like the integer `10`.
fn number_text(number: &Number) -> String {
    if !number.is_f64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(value) if value == 0.0 => "0".to_string(),
        Some(value) if value.fract() == 0.0 && value.abs() < 1e21 => format!("{:.0}", value),
        _ => number.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// STORED ROW
// ============================================================================

/// A review row as stored by the backend.
///
/// Documents the row shape; rows returned by the backend are passed to
/// callers as raw JSON so unexpected column types never fail a request.
/// Nullable columns are optional. Columns this service does not know about
/// (timestamps, owner) are kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Review {
    pub id: RecordKey,
    pub course_id: RecordKey,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub difficulty: Option<Number>,
    /// Persisted as "<hours> hrs/wk"
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub rating: Option<Number>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(ignore))]
    pub extra: Map<String, Value>,
}
