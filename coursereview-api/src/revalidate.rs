//! On-demand page revalidation
//!
//! After a review changes, the front end's statically generated course page
//! is stale. [`Revalidator`] asks the front end to rebuild it by calling
//! `GET <base>/api/revalidate?secret=<token>&course=<course_id>`.
//!
//! The base URL is chosen once at startup: the configured public URL in
//! production, [`LOCAL_BASE_URL`] otherwise.

use std::fmt;

use coursereview_core::{ConfigError, RecordKey, RevalidationError};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{lookup_with_fallback, process_env, Environment};

/// Base URL used outside production.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000";

/// Path of the revalidation handler on the front end.
pub const REVALIDATE_PATH: &str = "/api/revalidate";

/// Revalidation settings.
#[derive(Clone)]
pub struct RevalidationConfig {
    /// Front-end origin the call is sent to
    pub base_url: String,

    /// Shared secret expected by the revalidation handler
    pub secret: SecretString,
}

impl fmt::Debug for RevalidationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevalidationConfig")
            .field("base_url", &self.base_url)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl RevalidationConfig {
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret: SecretString::new(secret.into().into()),
        }
    }

    /// Load from the process environment.
    ///
    /// # Environment Variables
    /// - `ON_DEMAND_ISR_TOKEN`: shared secret, required
    /// - `COURSEREVIEW_PUBLIC_URL` (or `NEXT_PUBLIC_API_URL`): production
    ///   base URL, required when `environment` is production
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        Self::from_lookup(environment, process_env)
    }

    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("ON_DEMAND_ISR_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "ON_DEMAND_ISR_TOKEN".to_string(),
            })?;

        let base_url = if environment.is_production() {
            let url = lookup_with_fallback(&lookup, "COURSEREVIEW_PUBLIC_URL", "NEXT_PUBLIC_API_URL")
                .ok_or_else(|| ConfigError::MissingRequired {
                    field: "COURSEREVIEW_PUBLIC_URL".to_string(),
                })?;
            reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
                field: "COURSEREVIEW_PUBLIC_URL".to_string(),
                value: url.clone(),
                reason: e.to_string(),
            })?;
            url
        } else {
            LOCAL_BASE_URL.to_string()
        };

        Ok(Self::new(base_url, secret))
    }

    /// Full endpoint URL, without query string.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, REVALIDATE_PATH)
    }
}

/// Client for the revalidation endpoint.
#[derive(Clone)]
pub struct Revalidator {
    http: reqwest::Client,
    config: RevalidationConfig,
}

impl Revalidator {
    pub fn new(config: RevalidationConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &RevalidationConfig {
        &self.config
    }

    /// Ask the front end to rebuild the page of one course.
    ///
    /// No retries. A non-2xx answer is `RevalidationError::Status`; a request
    /// that never completes is `RevalidationError::Transport`.
    pub async fn revalidate(&self, course_id: &RecordKey) -> Result<(), RevalidationError> {
        let course = course_id.to_string();

        let response = self
            .http
            .get(self.config.endpoint())
            .query(&[
                ("secret", self.config.secret.expose_secret()),
                ("course", course.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the secret in its query string.
                let e = e.without_url();
                tracing::warn!(course_id = %course, error = %e, "Revalidation request failed");
                RevalidationError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(course_id = %course, status = %status, "Course page revalidated");
            Ok(())
        } else {
            tracing::warn!(
                course_id = %course,
                status = %status,
                "Revalidation failed with non-2xx status"
            );
            Err(RevalidationError::Status {
                status: status.as_u16(),
            })
        }
    }
}
