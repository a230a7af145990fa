// src/db/supply_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::supply::{SupplyType, ZoneSupply, ZoneSupplyRow},
};

// Tipos de suprimento e a tabela `zone_supplies`
#[derive(Clone)]
pub struct SupplyRepository {
    pool: PgPool,
}

impl SupplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Tipos de suprimento
    // ---

    pub async fn list_supply_types(&self) -> Result<Vec<SupplyType>, AppError> {
        let types = sqlx::query_as::<_, SupplyType>(
            "SELECT id, name FROM supply_types ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }

    pub async fn find_supply_type<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<SupplyType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supply_type = sqlx::query_as::<_, SupplyType>(
            "SELECT id, name FROM supply_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(supply_type)
    }

    /// Cria o tipo se ainda não existir (idempotente pelo nome).
    pub async fn ensure_supply_type(&self, name: &str) -> Result<SupplyType, AppError> {
        let supply_type = sqlx::query_as::<_, SupplyType>(
            r#"
            INSERT INTO supply_types (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(supply_type)
    }

    // ---
    // Suprimentos por zona
    // ---

    pub async fn get_zone_supplies<'e, E>(
        &self,
        executor: E,
        zone_id: &str,
    ) -> Result<Vec<ZoneSupply>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplies = sqlx::query_as::<_, ZoneSupply>(
            r#"
            SELECT supply_type_id, quantity, need, last_updated
            FROM zone_supplies
            WHERE zone_id = $1
            ORDER BY supply_type_id
            "#,
        )
        .bind(zone_id)
        .fetch_all(executor)
        .await?;
        Ok(supplies)
    }

    pub async fn list_zone_supplies(&self, zone_id: &str) -> Result<Vec<ZoneSupply>, AppError> {
        self.get_zone_supplies(&self.pool, zone_id).await
    }

    // Uma consulta só para todas as zonas de uma região
    pub async fn supplies_for_zones(&self, zone_ids: &[String]) -> Result<Vec<ZoneSupplyRow>, AppError> {
        let rows = sqlx::query_as::<_, ZoneSupplyRow>(
            r#"
            SELECT zone_id, supply_type_id, quantity, need, last_updated
            FROM zone_supplies
            WHERE zone_id = ANY($1)
            ORDER BY zone_id, supply_type_id
            "#,
        )
        .bind(zone_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn upsert_zone_supply<'e, E>(
        &self,
        executor: E,
        zone_id: &str,
        supply: &ZoneSupply,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO zone_supplies (zone_id, supply_type_id, quantity, need, last_updated)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (zone_id, supply_type_id) DO UPDATE
            SET quantity = EXCLUDED.quantity,
                need = EXCLUDED.need,
                last_updated = EXCLUDED.last_updated
            "#,
        )
        .bind(zone_id)
        .bind(supply.supply_type_id)
        .bind(supply.quantity)
        .bind(supply.need)
        .bind(supply.last_updated)
        .execute(executor)
        .await
        .map_err(|e| {
            // FK de supply_type_id violada: tipo inexistente
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::SupplyTypeNotFound(supply.supply_type_id);
                }
            }
            e.into()
        })?;
        Ok(())
    }

    pub async fn delete_zone_supplies<'e, E>(&self, executor: E, zone_id: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM zone_supplies WHERE zone_id = $1")
            .bind(zone_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
