use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Organização não encontrada")]
    OrganizationNotFound,

    #[error("Região não encontrada: {0}")]
    RegionNotFound(String),

    #[error("Zona não encontrada: {0}")]
    ZoneNotFound(String),

    #[error("Tipo de suprimento não encontrado: {0}")]
    SupplyTypeNotFound(Uuid),

    #[error("Tipo de suprimento repetido: {0}")]
    DuplicateSupplyType(Uuid),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::DuplicateSupplyType(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::OrganizationNotFound
            | AppError::RegionNotFound(_)
            | AppError::ZoneNotFound(_)
            | AppError::SupplyTypeNotFound(_) => StatusCode::NOT_FOUND,
            // Banco, bcrypt, JWT e afins viram 500.
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro na mensagem visível ao usuário, no idioma pedido.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        // A mensagem do validator é uma chave do catálogo
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(&*e.code);
                            store.translate(lang, key)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (store.translate(lang, "validation"), Some(details))
            }
            AppError::EmailAlreadyExists => (store.translate(lang, "email_already_exists"), None),
            AppError::InvalidCredentials => (store.translate(lang, "invalid_credentials"), None),
            AppError::InvalidToken => (store.translate(lang, "invalid_token"), None),
            AppError::OrganizationNotFound => (store.translate(lang, "organization_not_found"), None),
            AppError::RegionNotFound(code) => (store.translate_with(lang, "region_not_found", code), None),
            AppError::ZoneNotFound(id) => (store.translate_with(lang, "zone_not_found", id), None),
            AppError::SupplyTypeNotFound(id) => {
                (store.translate_with(lang, "supply_type_not_found", &id.to_string()), None)
            }
            AppError::DuplicateSupplyType(id) => {
                (store.translate_with(lang, "duplicate_supply_type", &id.to_string()), None)
            }
            // O `tracing` loga a mensagem detalhada; o usuário só vê a genérica.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (store.translate(lang, "internal"), None)
            }
        };

        ApiError { status, error, details }
    }
}

// Usado onde não há idioma em mãos (ex: middleware)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn en() -> Locale {
        Locale("en".into())
    }

    #[test]
    fn not_found_errors_map_to_404() {
        let store = I18nStore::default();
        let api = AppError::RegionNotFound("XX".into()).to_api_error(&en(), &store);
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Region 'XX' not found.");
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("validation.quantity_min".into());
        errors.add("quantity", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &I18nStore::default());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Um ou mais campos são inválidos.");
        let details = api.details.unwrap();
        assert_eq!(details["quantity"], vec!["A quantidade deve ser de pelo menos 1.".to_string()]);
    }

    #[test]
    fn field_messages_follow_request_language() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("email");
        err.message = Some("validation.email_invalid".into());
        errors.add("email", err);
        // Sem mensagem: o código vira a chave (e, sem tradução, o próprio texto)
        errors.add("website", ValidationError::new("url"));

        let api = AppError::ValidationError(errors).to_api_error(&en(), &I18nStore::default());
        let details = api.details.unwrap();
        assert_eq!(details["email"], vec!["The e-mail provided is invalid.".to_string()]);
        assert_eq!(details["website"], vec!["url".to_string()]);
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("pool exhausted"))
            .to_api_error(&en(), &I18nStore::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
    }
}
