// src/handlers/regions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::{
        map::{FeatureCollection, SupplyFilterQuery, ZoneSummary},
        region::Region,
    },
};

#[utoipa::path(
    get,
    path = "/api/regions",
    tag = "Regions",
    responses(
        (status = 200, description = "Regiões disponíveis", body = Vec<Region>)
    )
)]
pub async fn list_regions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let regions = app_state
        .map_service
        .list_regions()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(regions)))
}

#[utoipa::path(
    get,
    path = "/api/regions/{code}",
    tag = "Regions",
    responses(
        (status = 200, description = "Região", body = Region),
        (status = 404, description = "Região não encontrada")
    ),
    params(
        ("code" = String, Path, description = "Código do país, ex: PS")
    )
)]
pub async fn get_region(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let region = app_state
        .map_service
        .region(&code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(region)))
}

// Lista lateral: uma linha por zona com a cor e a razão do filtro
#[utoipa::path(
    get,
    path = "/api/regions/{code}/zones",
    tag = "Regions",
    responses(
        (status = 200, description = "Resumo das zonas", body = Vec<ZoneSummary>),
        (status = 404, description = "Região não encontrada")
    ),
    params(
        ("code" = String, Path, description = "Código do país"),
        SupplyFilterQuery
    )
)]
pub async fn list_zones(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
    Query(filter): Query<SupplyFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = app_state
        .map_service
        .zone_summaries(&code, filter.supply_type)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summaries)))
}

#[utoipa::path(
    get,
    path = "/api/regions/{code}/map",
    tag = "Regions",
    responses(
        (status = 200, description = "GeoJSON com fillColor por zona", body = FeatureCollection),
        (status = 404, description = "Região não encontrada")
    ),
    params(
        ("code" = String, Path, description = "Código do país"),
        SupplyFilterQuery
    )
)]
pub async fn get_map(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
    Query(filter): Query<SupplyFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let collection = app_state
        .map_service
        .feature_collection(&code, filter.supply_type)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(collection)))
}
