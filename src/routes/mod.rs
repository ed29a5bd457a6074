//! HTTP route handlers.
//!
//! - `health`: liveness, readiness, metrics and version endpoints
//! - `shifts`: shift CRUD plus the next-shift and overlap lookups
//! - `licences`: car licence create/read/delete
//! - `search`: full-text search over the mirrors

pub mod health;
pub mod licences;
pub mod search;
pub mod shifts;

use axum::{
    routing::{get, post},
    Router,
};

use crate::error::{AppError, AppResult};
use crate::search::SearchError;
use crate::state::AppState;

/// All routes with state applied. Cross-cutting layers are added in `main`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route(
            "/api/shifts",
            post(shifts::create_shift).put(shifts::update_shift).get(shifts::list_shifts),
        )
        .route("/api/shifts/next", get(shifts::next_shift))
        .route("/api/shifts/overlapping", get(shifts::overlapping_shifts))
        .route("/api/shifts/{id}", get(shifts::get_shift).delete(shifts::delete_shift))
        .route("/api/car-licences", post(licences::create_car_licence).get(licences::list_car_licences))
        .route(
            "/api/car-licences/{id}",
            get(licences::get_car_licence).delete(licences::delete_car_licence),
        )
        .route("/api/_search/shifts", get(search::search_shifts))
        .route("/api/_search/car-licences", get(search::search_car_licences))
        .with_state(state)
}

/// Second half of a dual write. The store change is already committed and is
/// not undone when the mirror fails; the caller gets a 500 and the mirror
/// stays stale until the next rebuild.
pub(crate) fn mirror_written(
    state: &AppState,
    entity: &'static str,
    id: i64,
    res: Result<(), SearchError>,
) -> AppResult<()> {
    res.map_err(|e| {
        state.metrics.inc_mirror_failures();
        tracing::warn!(entity, id, "search mirror not updated after store commit: {}", e);
        AppError::SearchMirror(e.to_string())
    })
}
