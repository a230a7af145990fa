// src/handlers/zones.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthSession, i18n::Locale},
    models::{
        region::Zone,
        supply::{SupplyType, UpdateZoneSuppliesPayload, ZoneSupply},
    },
};

#[utoipa::path(
    get,
    path = "/api/supply-types",
    tag = "Supplies",
    responses(
        (status = 200, description = "Tipos de suprimento", body = Vec<SupplyType>)
    )
)]
pub async fn list_supply_types(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let supply_types = app_state
        .supply_service
        .list_supply_types()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supply_types)))
}

#[utoipa::path(
    get,
    path = "/api/zones/{zone_id}",
    tag = "Zones",
    responses(
        (status = 200, description = "Zona com fronteira e suprimentos", body = Zone),
        (status = 404, description = "Zona não encontrada")
    ),
    params(
        ("zone_id" = String, Path, description = "ID da zona, ex: PS-rafah")
    )
)]
pub async fn get_zone(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(zone_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let zone = app_state
        .map_service
        .zone(&zone_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(zone)))
}

#[utoipa::path(
    get,
    path = "/api/zones/{zone_id}/supplies",
    tag = "Zones",
    responses(
        (status = 200, description = "Suprimentos da zona", body = Vec<ZoneSupply>),
        (status = 404, description = "Zona não encontrada")
    ),
    params(
        ("zone_id" = String, Path, description = "ID da zona")
    )
)]
pub async fn get_zone_supplies(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(zone_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let supplies = app_state
        .supply_service
        .get_zone_supplies(&zone_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supplies)))
}

// PUT substitui a lista inteira
#[utoipa::path(
    put,
    path = "/api/zones/{zone_id}/supplies",
    tag = "Zones",
    request_body = UpdateZoneSuppliesPayload,
    responses(
        (status = 200, description = "Suprimentos gravados", body = Vec<ZoneSupply>),
        (status = 400, description = "Quantidades negativas ou tipo repetido"),
        (status = 404, description = "Zona ou tipo de suprimento não encontrado")
    ),
    params(
        ("zone_id" = String, Path, description = "ID da zona")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_zone_supplies(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthSession(session): AuthSession,
    Path(zone_id): Path<String>,
    Json(payload): Json<UpdateZoneSuppliesPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplies = app_state
        .supply_service
        .update_zone_supplies(&session, &zone_id, &payload.supplies)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supplies)))
}
