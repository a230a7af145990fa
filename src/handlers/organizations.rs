// src/handlers/organizations.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthSession, i18n::Locale},
    models::{donation::Donation, organization::Organization, region::Region},
};

// GET /api/organizations/me
#[utoipa::path(
    get,
    path = "/api/organizations/me",
    tag = "Organizations",
    responses(
        (status = 200, description = "Organização logada", body = Organization),
        (status = 401, description = "Token inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthSession(session): AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    let organization = app_state
        .auth_service
        .current_organization(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(organization)))
}

// GET /api/organizations/me/donations
#[utoipa::path(
    get,
    path = "/api/organizations/me/donations",
    tag = "Organizations",
    responses(
        (status = 200, description = "Doações da organização, mais recentes primeiro", body = Vec<Donation>)
    ),
    security(("api_jwt" = []))
)]
pub async fn my_donations(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthSession(session): AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    let donations = app_state
        .donation_service
        .list_for_session(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(donations)))
}

// GET /api/organizations/me/region
// Região em que o mapa deve abrir para esta organização
#[utoipa::path(
    get,
    path = "/api/organizations/me/region",
    tag = "Organizations",
    responses(
        (status = 200, description = "Região da última doação ou a padrão", body = Region),
        (status = 404, description = "Nem a região padrão existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_region(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthSession(session): AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    let region = app_state
        .map_service
        .preferred_region(Some(&session))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(region)))
}
