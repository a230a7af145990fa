// src/db/donation_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::donation::{Donation, DonationStatus},
};

#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        zone_id: &str,
        supply_type_id: Uuid,
        quantity: i64,
        status: DonationStatus,
        notes: Option<&str>,
    ) -> Result<Donation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let donation = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (organization_id, zone_id, supply_type_id, quantity, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, organization_id, zone_id, supply_type_id, quantity, status, notes,
                      created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(zone_id)
        .bind(supply_type_id)
        .bind(quantity)
        .bind(status)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(donation)
    }

    pub async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            r#"
            SELECT id, organization_id, zone_id, supply_type_id, quantity, status, notes,
                   created_at, updated_at
            FROM donations
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }
}
