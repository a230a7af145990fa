// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{organization_repo::NewOrganization, OrganizationRepository, TokenRepository},
    models::organization::{Claims, Organization, RegisterOrganizationPayload, Session},
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    organization_repo: OrganizationRepository,
    token_repo: TokenRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        organization_repo: OrganizationRepository,
        token_repo: TokenRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { organization_repo, token_repo, jwt_secret, pool }
    }

    /// Cadastra a organização e já devolve o token de acesso.
    pub async fn register_organization(
        &self,
        payload: &RegisterOrganizationPayload,
    ) -> Result<String, AppError> {
        // 1. Hashing fora do runtime assíncrono
        let password_clone = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Credibilidade inicial de 1 a 5
        let credibility: i16 = rand::thread_rng().gen_range(1..=5);

        let mut tx = self.pool.begin().await?;

        let organization = self
            .organization_repo
            .create(
                &mut *tx,
                &NewOrganization {
                    name: &payload.organization_name,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    website: payload.website.as_deref(),
                    contact_phone: payload.contact_phone.as_deref(),
                    supply_types: &payload.supply_types,
                    countries: &payload.countries,
                    credibility,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(organization_id = %organization.id, "Organização cadastrada");
        self.create_token(organization.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let organization = self
            .organization_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = organization.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(organization.id)
    }

    /// Encerra a sessão: o `jti` do token passa a ser recusado.
    pub async fn logout(&self, session: &Session) -> Result<(), AppError> {
        self.token_repo
            .revoke(session.token_id, session.organization_id(), session.expires_at)
            .await?;
        tracing::info!(organization_id = %session.organization_id(), "Sessão encerrada");
        Ok(())
    }

    /// Valida o token e monta a sessão explícita.
    pub async fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let claims = self.decode_token(token)?;

        if self.token_repo.is_revoked(claims.jti).await? {
            return Err(AppError::InvalidToken);
        }

        let organization = self
            .organization_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::OrganizationNotFound)?;

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp as i64, 0)
            .ok_or(AppError::InvalidToken)?;

        Ok(Session {
            organization,
            token_id: claims.jti,
            expires_at,
        })
    }

    pub async fn current_organization(&self, session: &Session) -> Result<Organization, AppError> {
        self.organization_repo
            .find_by_id(session.organization_id())
            .await?
            .ok_or(AppError::OrganizationNotFound)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }

    fn create_token(&self, organization_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: organization_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
