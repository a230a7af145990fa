// src/db/region_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::region::{NewZone, Region, ZoneRecord},
};

// Regiões, zonas e fronteiras
#[derive(Clone)]
pub struct RegionRepository {
    pool: PgPool,
}

const ZONE_RECORD_SELECT: &str = r#"
    SELECT z.id, z.name, z.region_id, z.zone_type, z.boundary_id, b.geometry
    FROM zones z
    LEFT JOIN boundaries b ON b.id = z.boundary_id
"#;

impl RegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_regions(&self) -> Result<Vec<Region>, AppError> {
        let regions = sqlx::query_as::<_, Region>(
            "SELECT id, code, name, center, zoom, zone_refs FROM regions ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(regions)
    }

    pub async fn find_region_by_code(&self, code: &str) -> Result<Option<Region>, AppError> {
        let region = sqlx::query_as::<_, Region>(
            "SELECT id, code, name, center, zoom, zone_refs FROM regions WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(region)
    }

    // Zonas (com a geometria em texto) na ordem em que foram pedidas
    pub async fn find_zone_records(&self, zone_ids: &[String]) -> Result<Vec<ZoneRecord>, AppError> {
        let query = format!(
            "{ZONE_RECORD_SELECT} WHERE z.id = ANY($1) ORDER BY array_position($1, z.id)"
        );
        let records = sqlx::query_as::<_, ZoneRecord>(&query)
            .bind(zone_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    pub async fn find_zone_record(&self, zone_id: &str) -> Result<Option<ZoneRecord>, AppError> {
        let query = format!("{ZONE_RECORD_SELECT} WHERE z.id = $1");
        let record = sqlx::query_as::<_, ZoneRecord>(&query)
            .bind(zone_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// Trava a linha da zona até o fim da transação e devolve a região dela.
    /// Doações concorrentes para a mesma zona ficam em fila aqui.
    pub async fn lock_zone<'e, E>(&self, executor: E, zone_id: &str) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let region_id = sqlx::query_scalar::<_, String>(
            "SELECT region_id FROM zones WHERE id = $1 FOR UPDATE",
        )
        .bind(zone_id)
        .fetch_optional(executor)
        .await?;
        Ok(region_id)
    }

    // ---
    // Escrita (usada pelo seed)
    // ---

    pub async fn upsert_zone_with_boundary(&self, zone: &NewZone) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO boundaries (id, zone_id, geometry) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET geometry = EXCLUDED.geometry, zone_id = EXCLUDED.zone_id
            "#,
        )
        .bind(&zone.boundary_id)
        .bind(&zone.id)
        .bind(&zone.geometry)
        .execute(&mut *tx)
        .await?;

        // Os suprimentos da zona ficam intactos num re-seed
        sqlx::query(
            r#"
            INSERT INTO zones (id, name, region_id, zone_type, boundary_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                region_id = EXCLUDED.region_id,
                zone_type = EXCLUDED.zone_type,
                boundary_id = EXCLUDED.boundary_id
            "#,
        )
        .bind(&zone.id)
        .bind(&zone.name)
        .bind(&zone.region_id)
        .bind(&zone.zone_type)
        .bind(&zone.boundary_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn upsert_region(&self, region: &Region) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO regions (id, code, name, center, zoom, zone_refs)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET code = EXCLUDED.code,
                name = EXCLUDED.name,
                center = EXCLUDED.center,
                zoom = EXCLUDED.zoom,
                zone_refs = EXCLUDED.zone_refs
            "#,
        )
        .bind(&region.id)
        .bind(&region.code)
        .bind(&region.name)
        .bind(&region.center)
        .bind(region.zoom)
        .bind(&region.zone_refs)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
