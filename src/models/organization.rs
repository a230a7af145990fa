// src/models/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Representa uma organização vinda do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub website: Option<String>,
    pub contact_phone: Option<String>,
    pub supply_types: Vec<Uuid>,
    pub countries: Vec<String>,
    pub credibility: i16,
    pub donations: Vec<Uuid>,
    pub last_donation_region: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Códigos de país com duas letras maiúsculas (ex: "PS")
fn validate_country_codes(codes: &[String]) -> Result<(), ValidationError> {
    let valid = codes
        .iter()
        .all(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_uppercase()));

    if !valid {
        let mut err = ValidationError::new("country_code");
        err.message = Some("validation.country_code".into());
        return Err(err);
    }
    Ok(())
}

// Dados para o cadastro de uma nova organização
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOrganizationPayload {
    #[validate(length(min = 1, message = "validation.organization_name_required"))]
    pub organization_name: String,

    #[validate(email(message = "validation.email_invalid"))]
    pub email: String,

    #[validate(length(min = 6, message = "validation.password_too_short"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "validation.password_mismatch"))]
    pub confirm_password: String,

    #[validate(url(message = "validation.website_invalid"))]
    pub website: Option<String>,

    pub contact_phone: Option<String>,

    #[serde(default)]
    pub supply_types: Vec<Uuid>,

    #[serde(default)]
    #[validate(custom(function = "validate_country_codes"))]
    pub countries: Vec<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "validation.email_invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "validation.password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID da organização
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
    pub jti: Uuid,  // ID do token (usado no logout)
}

/// Sessão explícita: a organização autenticada e o token que a abriu.
/// Criada pelo `auth_guard` e repassada aos serviços.
#[derive(Debug, Clone)]
pub struct Session {
    pub organization: Organization,
    pub token_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn organization_id(&self) -> Uuid {
        self.organization.id
    }
}
