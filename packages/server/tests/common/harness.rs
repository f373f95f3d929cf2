//! Test harness for driving the HTTP API in-process.
//!
//! Each test gets a fresh in-memory store and its own provider chain. No
//! network or database is touched; requests go straight into the Router.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use server_core::kernel::TestDependencies;
use server_core::server::build_app;
use test_context::AsyncTestContext;
use tower::ServiceExt;

/// Test harness wrapping an app built from test dependencies.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &mut TestHarness) {
///     let (status, body) = ctx.get("/api/posts").await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub app: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        init_tracing();
        Self::with_deps(TestDependencies::new())
    }

    async fn teardown(self) {
        // In-memory store is dropped with the app
    }
}

impl TestHarness {
    /// Build a harness around custom dependencies (mock providers, vocabulary).
    pub fn with_deps(deps: TestDependencies) -> Self {
        Self {
            app: build_app(deps.into_server_deps()),
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body.to_string())).await
    }

    /// Send a raw body, for malformed-JSON cases.
    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body.to_string())).await
    }

    async fn request(&self, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    /// Create a post and return its JSON, asserting 201.
    pub async fn create_post(&self, body: Value) -> Value {
        let (status, json) = self.post("/api/posts", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        json["data"].clone()
    }
}

/// Initialize tracing once, respecting RUST_LOG.
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
