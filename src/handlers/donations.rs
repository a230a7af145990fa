// src/handlers/donations.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthSession, i18n::Locale},
    models::donation::{CreateDonationPayload, Donation},
};

#[utoipa::path(
    post,
    path = "/api/donations",
    tag = "Donations",
    request_body = CreateDonationPayload,
    responses(
        (status = 201, description = "Doação registrada e suprimento da zona atualizado", body = Donation),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Token inválido"),
        (status = 404, description = "Zona ou tipo de suprimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_donation(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthSession(session): AuthSession,
    Json(payload): Json<CreateDonationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let donation = app_state
        .donation_service
        .record_donation(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(donation)))
}
