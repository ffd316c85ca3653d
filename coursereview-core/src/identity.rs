//! Caller identity types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user as resolved by the backend's auth API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Extract the bearer token from an `Authorization` header value.
///
/// The token is the segment after the first space (`"Bearer <token>"`).
/// Returns `None` when there is no such segment or it is empty.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer xyz"), Some("xyz"));
        assert_eq!(bearer_token("Token xyz trailing"), Some("xyz"));
    }

    #[test]
    fn test_bearer_token_missing() {
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_auth_user_deserialize() {
        let user: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "8d0f-42",
            "email": "student@example.edu",
            "role": "authenticated",
            "aud": "authenticated"
        }))
        .unwrap();
        assert_eq!(user.id, "8d0f-42");
        assert_eq!(user.role.as_deref(), Some("authenticated"));
        assert!(user.extra.contains_key("aud"));
    }
}
