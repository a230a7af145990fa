// src/db/organization_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::organization::Organization};

const ORGANIZATION_COLUMNS: &str = r#"
    id, name, email, password_hash, website, contact_phone,
    supply_types, countries, credibility, donations,
    last_donation_region, created_at
"#;

// Dados já tratados (senha com hash) para inserir uma organização
pub struct NewOrganization<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub website: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub supply_types: &'a [Uuid],
    pub countries: &'a [String],
    pub credibility: i16,
}

// O repositório de organizações, responsável pela tabela 'organizations'
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca uma organização pelo e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Organization>, AppError> {
        let query = format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE email = $1");
        let maybe_org = sqlx::query_as::<_, Organization>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_org)
    }

    // Busca uma organização pelo ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let query = format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1");
        let maybe_org = sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_org)
    }

    // Cria a organização, com tratamento específico para e-mails duplicados.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        new_org: &NewOrganization<'_>,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            r#"
            INSERT INTO organizations (
                name, email, password_hash, website, contact_phone,
                supply_types, countries, credibility
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORGANIZATION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Organization>(&query)
            .bind(new_org.name)
            .bind(new_org.email)
            .bind(new_org.password_hash)
            .bind(new_org.website)
            .bind(new_org.contact_phone)
            .bind(new_org.supply_types)
            .bind(new_org.countries)
            .bind(new_org.credibility)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation()
                        && db_err.constraint() == Some("organizations_email_key")
                    {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })
    }

    /// Guarda a região da última doação e acrescenta a doação à lista da organização.
    pub async fn register_donation<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        region_code: &str,
        donation_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET last_donation_region = $2,
                donations = array_append(donations, $3)
            WHERE id = $1
            "#,
        )
        .bind(organization_id)
        .bind(region_code)
        .bind(donation_id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::OrganizationNotFound);
        }
        Ok(())
    }
}
