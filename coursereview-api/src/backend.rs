//! Backend Access Factory
//!
//! Handles to the hosted backend (a Supabase-style project exposing a
//! PostgREST data API under `/rest/v1` and an auth API under `/auth/v1`).
//!
//! - [`BackendClient`] is the default handle. It authenticates with the
//!   project's public (anon) key and is built once at startup.
//! - [`ScopedClient`] forwards one caller's `Authorization` value on every
//!   request so the backend's row-level policies decide what the caller may
//!   touch. It is built per request and holds nothing but the header.
//!
//! # Environment Variables
//! - `SUPABASE_URL` (or `NEXT_PUBLIC_SUPABASE_URL`): project URL, required
//! - `SUPABASE_ANON_KEY` (or `NEXT_PUBLIC_SUPABASE_ANON_KEY`): public key, required

use std::sync::Arc;

use coursereview_core::{AuthUser, BackendError, ConfigError, RecordKey, ReviewChanges};
use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::{lookup_with_fallback, process_env};

/// Table holding review rows.
pub const REVIEWS_TABLE: &str = "Reviews";

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Connection settings for the hosted backend.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project URL without trailing slash
    pub url: String,

    /// Public (anon) API key
    pub anon_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl BackendConfig {
    /// Create backend configuration with explicit values.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: SecretString::new(anon_key.into().into()),
        }
    }

    /// Load from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingRequired` when the URL or key is absent,
    /// and `ConfigError::InvalidValue` when the URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup_with_fallback(&lookup, "SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL")
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "SUPABASE_URL".to_string(),
            })?;

        reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
            field: "SUPABASE_URL".to_string(),
            value: url.clone(),
            reason: e.to_string(),
        })?;

        let anon_key =
            lookup_with_fallback(&lookup, "SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY")
                .ok_or_else(|| ConfigError::MissingRequired {
                    field: "SUPABASE_ANON_KEY".to_string(),
                })?;

        Ok(Self::new(url, anon_key))
    }
}

// ============================================================================
// CONNECTION
// ============================================================================

/// HTTP client plus project settings, shared by both handle kinds.
#[derive(Clone)]
struct Connection {
    http: reqwest::Client,
    config: Arc<BackendConfig>,
}

impl Connection {
    fn request(&self, method: Method, path: &str, authorization: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.config.url, path))
            .header("apikey", self.config.anon_key.expose_secret())
            .header(AUTHORIZATION, authorization)
    }
}

async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
    request
        .send()
        .await
        .map_err(|e| BackendError::Transport(e.without_url().to_string()))
}

/// First human-readable message in a backend error body.
///
/// The auth API uses `msg` or `error_description`; the data API uses
/// `message`.
fn error_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

async fn error_body(response: Response) -> (u16, Option<String>) {
    let status = response.status().as_u16();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .as_ref()
        .and_then(error_message);
    (status, message)
}

async fn rejected(response: Response) -> BackendError {
    let fallback = response
        .status()
        .canonical_reason()
        .unwrap_or("Backend request failed")
        .to_string();
    let (status, message) = error_body(response).await;
    BackendError::Rejected {
        status,
        message: message.unwrap_or(fallback),
    }
}

/// Rows of a read. Any JSON array is accepted; columns pass through as sent.
async fn decode_rows(response: Response) -> Result<Vec<Value>, BackendError> {
    response
        .json::<Vec<Value>>()
        .await
        .map_err(|e| BackendError::InvalidResponse {
            reason: e.without_url().to_string(),
        })
}

/// Rows echoed by a committed write.
///
/// The write has already happened, so this never fails: a body that cannot
/// be read or is not JSON is logged and reported as no rows.
async fn written_rows(response: Response) -> Vec<Value> {
    match response.bytes().await {
        Ok(body) => rows_from_body(&body),
        Err(e) => {
            tracing::warn!(error = %e.without_url(), "Could not read rows returned by write");
            Vec::new()
        }
    }
}

fn rows_from_body(body: &[u8]) -> Vec<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(rows)) => rows,
        Ok(Value::Null) => Vec::new(),
        Ok(row) => vec![row],
        Err(e) => {
            tracing::warn!(error = %e, "Rows returned by write are not JSON");
            Vec::new()
        }
    }
}

// ============================================================================
// DEFAULT CLIENT
// ============================================================================

/// Default backend handle, authenticated with the public key.
#[derive(Clone)]
pub struct BackendClient {
    conn: Connection,
}

impl BackendClient {
    /// Build the default handle (`createDefaultClient`).
    pub fn new(config: BackendConfig, http: reqwest::Client) -> Self {
        Self {
            conn: Connection {
                http,
                config: Arc::new(config),
            },
        }
    }

    /// Build a handle scoped to a caller (`createScopedClient`).
    ///
    /// The header value is forwarded verbatim. No I/O happens here.
    pub fn scoped(&self, authorization: impl Into<String>) -> ScopedClient {
        ScopedClient {
            conn: self.conn.clone(),
            authorization: authorization.into(),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.conn.config
    }

    fn anon_authorization(&self) -> String {
        format!("Bearer {}", self.conn.config.anon_key.expose_secret())
    }

    /// List the reviews of one course visible to the public key.
    pub async fn list_reviews(&self, course_id: &RecordKey) -> Result<Vec<Value>, BackendError> {
        let request = self
            .conn
            .request(
                Method::GET,
                &format!("/rest/v1/{}", REVIEWS_TABLE),
                &self.anon_authorization(),
            )
            .query(&[
                ("course_id", format!("eq.{}", course_id)),
                ("select", "*".to_string()),
            ]);

        let response = send(request).await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        decode_rows(response).await
    }

    /// Probe the data API root.
    pub async fn health_check(&self) -> Result<(), BackendError> {
        let request = self
            .conn
            .request(Method::GET, "/rest/v1/", &self.anon_authorization());

        let response = send(request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejected(response).await)
        }
    }
}

// ============================================================================
// SCOPED CLIENT
// ============================================================================

/// Backend handle acting as one caller.
#[derive(Clone)]
pub struct ScopedClient {
    conn: Connection,
    authorization: String,
}

impl std::fmt::Debug for ScopedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedClient")
            .field("url", &self.conn.config.url)
            .field("authorization", &"[REDACTED]")
            .finish()
    }
}

impl ScopedClient {
    /// The `Authorization` value this handle forwards.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Resolve a bearer token to a user through the auth API.
    ///
    /// Any non-2xx answer is `BackendError::Auth`, carrying the auth API's
    /// message when its body has one.
    pub async fn get_user(&self, token: &str) -> Result<AuthUser, BackendError> {
        let request = self
            .conn
            .request(Method::GET, "/auth/v1/user", &format!("Bearer {}", token));

        let response = send(request).await?;
        if !response.status().is_success() {
            let (status, message) = error_body(response).await;
            return Err(BackendError::Auth { status, message });
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| BackendError::InvalidResponse {
                reason: e.to_string(),
            })
    }

    /// Update the review row matching `id` and return the updated rows as
    /// the backend sent them.
    pub async fn update_review(
        &self,
        id: &RecordKey,
        changes: &ReviewChanges,
    ) -> Result<Vec<Value>, BackendError> {
        let request = self
            .conn
            .request(
                Method::PATCH,
                &format!("/rest/v1/{}", REVIEWS_TABLE),
                &self.authorization,
            )
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(changes);

        let response = send(request).await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        Ok(written_rows(response).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_requires_url() {
        let err = BackendConfig::from_lookup(lookup_from(&[("SUPABASE_ANON_KEY", "anon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired {
                field: "SUPABASE_URL".to_string()
            }
        );
    }

    #[test]
    fn test_config_requires_key() {
        let err = BackendConfig::from_lookup(lookup_from(&[(
            "SUPABASE_URL",
            "https://project.supabase.co",
        )]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired {
                field: "SUPABASE_ANON_KEY".to_string()
            }
        );
    }

    #[test]
    fn test_config_rejects_bad_url() {
        let err = BackendConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "not a url"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_config_legacy_names_and_trailing_slash() {
        let config = BackendConfig::from_lookup(lookup_from(&[
            ("NEXT_PUBLIC_SUPABASE_URL", "https://project.supabase.co/"),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon-key"),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://project.supabase.co");
        assert_eq!(config.anon_key.expose_secret(), "anon-key");
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = BackendConfig::new("https://project.supabase.co", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_scoped_client_forwards_header_verbatim() {
        let client = BackendClient::new(
            BackendConfig::new("https://project.supabase.co", "anon"),
            reqwest::Client::new(),
        );
        let scoped = client.scoped("Bearer caller-token");
        assert_eq!(scoped.authorization(), "Bearer caller-token");
        assert!(!format!("{:?}", scoped).contains("caller-token"));
    }

    #[test]
    fn test_error_message_keys() {
        assert_eq!(
            error_message(&serde_json::json!({"msg": "invalid JWT"})),
            Some("invalid JWT".to_string())
        );
        assert_eq!(
            error_message(&serde_json::json!({"code": "PGRST116", "message": "row not found"})),
            Some("row not found".to_string())
        );
        assert_eq!(
            error_message(&serde_json::json!({"error": "invalid_grant", "error_description": "expired"})),
            Some("expired".to_string())
        );
        assert_eq!(error_message(&serde_json::json!({"code": 401})), None);
    }

    #[test]
    fn test_written_rows_pass_through_any_column_types() {
        let rows = rows_from_body(br#"[{"id":1.5,"course_id":null,"difficulty":"4"}]"#);
        assert_eq!(
            rows,
            vec![serde_json::json!({"id": 1.5, "course_id": null, "difficulty": "4"})]
        );
    }

    #[test]
    fn test_written_rows_tolerate_odd_bodies() {
        assert!(rows_from_body(b"").is_empty());
        assert!(rows_from_body(b"null").is_empty());
        assert!(rows_from_body(b"<html>ok</html>").is_empty());
        assert_eq!(
            rows_from_body(br#"{"id":"r1"}"#),
            vec![serde_json::json!({"id": "r1"})]
        );
    }
}
