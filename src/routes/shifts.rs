use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::OwnedMutexGuard;

use super::mirror_written;
use crate::{
    error::{AppError, AppResult, OptionExt},
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::ip::MaybeRemoteAddr,
    overlap::{ResourceFilter, Window},
    paging::PageParams,
    state::{AppState, ResourceKey},
    store,
    types::{EntityRef, NextShiftQuery, OverlapQuery, Shift},
};

const ENTITY_NAME: &str = "shift";
const WRITE_LIMIT: &str = "/api/shifts:write";

/// With `shifts.reject_overlaps` set, locks the shift's car and driver. The
/// guards must be held until the write is committed.
async fn lock_resources(state: &AppState, shift: &Shift) -> Vec<OwnedMutexGuard<()>> {
    if !state.config.shifts.reject_overlaps {
        return Vec::new();
    }
    state.locks.acquire(ResourceKey::for_filter(&ResourceFilter::of(shift))).await
}

/// With `shifts.reject_overlaps` set, fails with 409 when another shift of the
/// same car or driver intersects this one. Call with the resource locks held.
async fn reject_conflicts(state: &AppState, shift: &Shift) -> AppResult<()> {
    if !state.config.shifts.reject_overlaps {
        return Ok(());
    }
    let conflicts: Vec<i64> = store::shifts::find_intersecting(
        &state.db,
        &ResourceFilter::of(shift),
        Window::new(shift.start, shift.end),
    )
    .await?
    .into_iter()
    .filter_map(|s| s.id)
    .filter(|id| Some(*id) != shift.id)
    .collect();
    if !conflicts.is_empty() {
        state.metrics.inc_conflicts_rejected();
        tracing::info!(?conflicts, "rejecting shift that overlaps existing shifts");
        return Err(AppError::Conflict(format!("shift overlaps existing shifts {:?}", conflicts)));
    }
    Ok(())
}

pub async fn create_shift(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    ApiJson(shift): ApiJson<Shift>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("REST request to save Shift : {:?}", shift);
    state.rate_limiter.check_endpoint_limit(WRITE_LIMIT, remote.client_ip(&headers)).await?;
    if shift.id.is_some() {
        return Err(AppError::bad_request_alert("A new shift cannot already have an ID", ENTITY_NAME, "idexists"));
    }

    let _guards = lock_resources(&state, &shift).await;
    reject_conflicts(&state, &shift).await?;
    let id = store::shifts::insert(&state.db, &shift).await?;
    state.metrics.inc_shifts_created();
    let saved = Shift { id: Some(id), ..shift };

    mirror_written(&state, ENTITY_NAME, id, state.shift_index.index(&saved).await)?;

    Ok((StatusCode::CREATED, [(header::LOCATION, format!("/api/shifts/{}", id))], Json(saved)))
}

pub async fn update_shift(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    ApiJson(shift): ApiJson<Shift>,
) -> AppResult<Json<Shift>> {
    tracing::debug!("REST request to update Shift : {:?}", shift);
    state.rate_limiter.check_endpoint_limit(WRITE_LIMIT, remote.client_ip(&headers)).await?;
    let id = shift.id.ok_or_else(|| AppError::bad_request_alert("Invalid id", ENTITY_NAME, "idnull"))?;

    let _guards = lock_resources(&state, &shift).await;
    if store::shifts::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!("Shift {} not found", id)));
    }
    reject_conflicts(&state, &shift).await?;
    if !store::shifts::update(&state.db, id, &shift).await? {
        return Err(AppError::NotFound(format!("Shift {} not found", id)));
    }
    state.metrics.inc_shifts_updated();

    mirror_written(&state, ENTITY_NAME, id, state.shift_index.index(&shift).await)?;
    Ok(Json(shift))
}

pub async fn list_shifts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("REST request to get a page of Shifts");
    let page = params.resolve(&state.config.api, store::shifts::SORTABLE)?;
    Ok(store::shifts::find_page(&state.db, &page).await?)
}

pub async fn get_shift(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> AppResult<Json<Shift>> {
    tracing::debug!("REST request to get Shift : {}", id);
    let shift = store::shifts::find_by_id(&state.db, id).await?.ok_or_not_found("Shift")?;
    Ok(Json(shift))
}

/// Deletes from the store, then from the mirror. The mirror entry is dropped
/// even when the store had no such row, so stale documents get cleaned up.
pub async fn delete_shift(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    tracing::debug!("REST request to delete Shift : {}", id);
    state.rate_limiter.check_endpoint_limit(WRITE_LIMIT, remote.client_ip(&headers)).await?;

    let existed = store::shifts::delete_by_id(&state.db, id).await?;
    if existed {
        state.metrics.inc_shifts_deleted();
    }
    mirror_written(&state, ENTITY_NAME, id, state.shift_index.remove(id).await)?;

    if !existed {
        return Err(AppError::NotFound(format!("Shift {} not found", id)));
    }
    Ok(StatusCode::OK)
}

pub async fn next_shift(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<NextShiftQuery>,
) -> AppResult<Json<Shift>> {
    tracing::debug!("REST request to get next Shift for safety driver {} from {}", q.safety_driver, q.start);
    let shift = store::shifts::find_next_for_driver(&state.db, EntityRef::new(q.safety_driver), q.start)
        .await?
        .ok_or_not_found("Shift")?;
    Ok(Json(shift))
}

pub async fn overlapping_shifts(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<OverlapQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    tracing::debug!("REST request to get overlapping Shifts : {:?}", q);
    state.metrics.inc_overlap_queries();
    let filter = ResourceFilter::new(q.car, q.safety_driver);
    if filter.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let shifts = store::shifts::find_overlapping(&state.db, &filter, Window::new(q.start, q.end)).await?;
    Ok(Json(shifts))
}
