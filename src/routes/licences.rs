use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use super::mirror_written;
use crate::{
    error::{AppError, AppResult, OptionExt},
    extract::{ApiJson, ApiPath, ApiQuery},
    paging::PageParams,
    state::AppState,
    store,
    types::CarLicence,
};

const ENTITY_NAME: &str = "carLicence";

pub async fn create_car_licence(
    State(state): State<AppState>,
    ApiJson(licence): ApiJson<CarLicence>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("REST request to save CarLicence : {:?}", licence);
    if licence.id.is_some() {
        return Err(AppError::bad_request_alert(
            "A new carLicence cannot already have an ID",
            ENTITY_NAME,
            "idexists",
        ));
    }

    let id = store::licences::insert(&state.db, &licence).await?;
    state.metrics.inc_licences_created();
    let saved = CarLicence { id: Some(id), ..licence };

    mirror_written(&state, ENTITY_NAME, id, state.licence_index.index(&saved).await)?;

    Ok((StatusCode::CREATED, [(header::LOCATION, format!("/api/car-licences/{}", id))], Json(saved)))
}

pub async fn list_car_licences(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("REST request to get a page of CarLicences");
    let page = params.resolve(&state.config.api, store::licences::SORTABLE)?;
    Ok(store::licences::find_page(&state.db, &page).await?)
}

pub async fn get_car_licence(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<CarLicence>> {
    tracing::debug!("REST request to get CarLicence : {}", id);
    let licence = store::licences::find_by_id(&state.db, id).await?.ok_or_not_found("CarLicence")?;
    Ok(Json(licence))
}

pub async fn delete_car_licence(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    tracing::debug!("REST request to delete CarLicence : {}", id);
    let existed = store::licences::delete_by_id(&state.db, id).await?;
    if existed {
        state.metrics.inc_licences_deleted();
    }
    mirror_written(&state, ENTITY_NAME, id, state.licence_index.remove(id).await)?;

    if !existed {
        return Err(AppError::NotFound(format!("CarLicence {} not found", id)));
    }
    Ok(StatusCode::OK)
}
