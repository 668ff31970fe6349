// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookmark_metadata::{
    metadata::{FetchLimits, MetadataExtractor, DEFAULT_FAVICON_PROXY},
    router,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret-min-32-characters-long!!";

/// Short enough that an unroutable host does not stall the suite.
pub const TEST_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Build the application router with a real extractor.
pub fn create_test_app() -> Router {
    let limits = FetchLimits {
        timeout: TEST_FETCH_TIMEOUT,
        ..FetchLimits::default()
    };
    let state = AppState {
        jwt_secret: Arc::from(TEST_JWT_SECRET),
        extractor: MetadataExtractor::new(limits, DEFAULT_FAVICON_PROXY)
            .expect("failed to build extractor"),
    };
    router(state)
}

/// Mint a token the way the identity provider would.
pub fn token_for(user_id: &str) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::minutes(15)).timestamp();
    encode(
        &Header::default(),
        &json!({ "sub": user_id, "exp": exp, "iat": chrono::Utc::now().timestamp() }),
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Serve `app` on an ephemeral loopback port and return its base URL
/// (e.g. "http://127.0.0.1:12345"). The server lives until the runtime ends.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    post_raw_authed(app, uri, token, body.to_string()).await
}

/// Like [`post_json_authed`] but sends `body` verbatim, so malformed JSON
/// can be exercised.
pub async fn post_raw_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: impl Into<String>,
) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    send(app, req).await
}

pub async fn post_json_no_auth(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get_no_auth(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Scenario helpers ─────────────────────────────────────────────────────────

/// POST `{ "url": url }` to `uri` as a freshly minted user.
pub async fn request_metadata(uri: &str, url: &str) -> (StatusCode, Value) {
    let token = token_for("user-under-test");
    post_json_authed(create_test_app(), uri, &token, json!({ "url": url })).await
}
