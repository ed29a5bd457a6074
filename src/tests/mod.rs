//! Integration and unit tests for the Shiftboard application.
//!
//! ## Test Modules
//!
//! - **shift_api_tests**: Shift endpoints, overlap and next-shift lookups, dual writes
//! - **licence_api_tests**: Car licence endpoints
//! - **search_tests**: Search endpoints and mirror rebuild
//! - **error_tests**: Error handling and response shape
//! - **config_tests**: Configuration loading and validation
//! - **db_tests**: Schema and store queries
//! - **health_api_tests**: Health, metrics and version endpoints
//!
//! Individual test modules can be run with:
//! ```bash
//! cargo test shift_api_tests
//! ```

pub mod config_tests;
pub mod health_api_tests;

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::config::AppConfig;
use crate::state::AppState;

/// A private in-memory database. One connection that never expires, so the
/// schema lives as long as the pool.
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::db::init_db(&pool).await.unwrap();
    pool
}

pub(crate) async fn test_state() -> AppState {
    test_state_with(AppConfig::default()).await
}

pub(crate) async fn test_state_with(config: AppConfig) -> AppState {
    AppState::new(memory_pool().await, config)
}

pub(crate) fn app(state: &AppState) -> Router {
    crate::routes::router(state.clone())
}

pub(crate) fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn delete_request(uri: &str) -> Request<Body> {
    Request::builder().method(Method::DELETE).uri(uri).body(Body::empty()).unwrap()
}

pub(crate) async fn body_json(res: Response<Body>) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub(crate) async fn body_text(res: Response<Body>) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
