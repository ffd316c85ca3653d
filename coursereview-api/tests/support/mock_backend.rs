#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use coursereview_api::{
    create_api_router, ApiConfig, AppState, BackendClient, BackendConfig, RevalidationConfig,
    Revalidator,
};
use coursereview_test_utils::{bearer_header, fixtures, TEST_ANON_KEY, TEST_ISR_SECRET};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::{
    matchers::{header as header_eq, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Router wired to two mock servers: the hosted backend and the front end
/// that serves the revalidation endpoint.
pub struct TestApp {
    pub backend: MockServer,
    pub front_end: MockServer,
    pub router: Router,
}

impl TestApp {
    pub async fn start() -> Self {
        Self::start_with_timeout(Duration::from_secs(5)).await
    }

    /// Same as [`TestApp::start`] with a custom timeout on outbound calls.
    pub async fn start_with_timeout(timeout: Duration) -> Self {
        let backend = MockServer::start().await;
        let front_end = MockServer::start().await;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let state = AppState::new(
            BackendClient::new(BackendConfig::new(backend.uri(), TEST_ANON_KEY), http.clone()),
            Revalidator::new(
                RevalidationConfig::new(front_end.uri(), TEST_ISR_SECRET),
                http,
            ),
        );
        let router = create_api_router(state, &ApiConfig::default());

        Self {
            backend,
            front_end,
            router,
        }
    }

    /// Auth API resolves the test token to `user-1`.
    pub async fn accept_token(&self) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header_eq("authorization", bearer_header().as_str()))
            .and(header_eq("apikey", TEST_ANON_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::auth_user("user-1")))
            .mount(&self.backend)
            .await;
    }

    /// Auth API refuses every token with the given status and body.
    pub async fn reject_token(&self, status: u16, body: Option<Value>) {
        let template = match body {
            Some(body) => ResponseTemplate::new(status).set_body_json(body),
            None => ResponseTemplate::new(status),
        };
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(template)
            .mount(&self.backend)
            .await;
    }

    /// Auth API must not be called.
    pub async fn expect_no_identity_lookup(&self) {
        Mock::given(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.backend)
            .await;
    }

    /// Data API must not receive a write.
    pub async fn expect_no_write(&self) {
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.backend)
            .await;
    }

    /// Revalidation endpoint answers `status`, exactly `times` times.
    pub async fn revalidation_responds(&self, course: &str, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path("/api/revalidate"))
            .and(query_param("secret", TEST_ISR_SECRET))
            .and(query_param("course", course))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(&self.front_end)
            .await;
    }

    /// Revalidation endpoint must not be called.
    pub async fn expect_no_revalidation(&self) {
        Mock::given(path("/api/revalidate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.front_end)
            .await;
    }

    /// Send a request through the router and decode the JSON body.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: impl Into<Body>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = builder.body(body.into()).expect("Failed to build request");

        let (status, _, json) = self.call(request).await;
        (status, json)
    }

    /// Send a bodiless request with extra headers; returns response headers too.
    pub async fn send_with_headers(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).expect("Failed to build request");
        self.call(request).await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router call failed");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, headers, json)
    }

    /// PUT an update body with the test bearer token.
    pub async fn put_update(&self, body: &Value) -> (StatusCode, Value) {
        self.send(
            "PUT",
            "/api/update.review",
            Some(bearer_header().as_str()),
            body.to_string(),
        )
        .await
    }
}
