use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};

use crate::{
    error::AppResult,
    extract::ApiQuery,
    middleware::{
        ip::MaybeRemoteAddr,
        validation::{sanitize_for_logging, sanitize_search_term},
    },
    paging::{PageParams, PageRequest},
    search::SearchQuery,
    state::AppState,
    types::SearchParams,
};

const SEARCH_LIMIT: &str = "/api/_search";

async fn prepare(
    state: &AppState,
    remote: MaybeRemoteAddr,
    headers: &HeaderMap,
    params: &SearchParams,
) -> AppResult<(SearchQuery, PageRequest)> {
    state.rate_limiter.check_endpoint_limit(SEARCH_LIMIT, remote.client_ip(headers)).await?;
    let sanitized = sanitize_search_term(&params.query)?;
    let query = SearchQuery::parse(&sanitized)?;
    // Mirror hits are always ordered by id
    let page = PageParams { page: params.page, size: params.size, sort: None }.resolve(&state.config.api, &[])?;
    state.metrics.inc_searches();
    Ok((query, page))
}

pub async fn search_shifts(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("REST request to search for a page of Shifts for query {}", sanitize_for_logging(&params.query));
    let (query, page) = prepare(&state, remote, &headers, &params).await?;
    Ok(state.shift_index.search(&query, &page).await?)
}

pub async fn search_car_licences(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("REST request to search for a page of CarLicences for query {}", sanitize_for_logging(&params.query));
    let (query, page) = prepare(&state, remote, &headers, &params).await?;
    Ok(state.licence_index.search(&query, &page).await?)
}
