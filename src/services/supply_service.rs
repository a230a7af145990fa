// src/services/supply_service.rs

use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{RegionRepository, SupplyRepository},
    models::{
        organization::Session,
        supply::{SupplyType, ZoneSupply, ZoneSupplyInput},
    },
    services::live::{ZoneUpdate, ZoneUpdateHub},
};

/// Garante um registro por tipo de suprimento na zona.
pub fn ensure_unique_supply_types(supplies: &[ZoneSupplyInput]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for supply in supplies {
        if !seen.insert(supply.supply_type_id) {
            return Err(AppError::DuplicateSupplyType(supply.supply_type_id));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct SupplyService {
    supply_repo: SupplyRepository,
    region_repo: RegionRepository,
    hub: ZoneUpdateHub,
    pool: PgPool,
}

impl SupplyService {
    pub fn new(
        supply_repo: SupplyRepository,
        region_repo: RegionRepository,
        hub: ZoneUpdateHub,
        pool: PgPool,
    ) -> Self {
        Self { supply_repo, region_repo, hub, pool }
    }

    pub async fn list_supply_types(&self) -> Result<Vec<SupplyType>, AppError> {
        self.supply_repo.list_supply_types().await
    }

    pub async fn get_zone_supplies(&self, zone_id: &str) -> Result<Vec<ZoneSupply>, AppError> {
        // Distingue "zona sem suprimentos" de "zona inexistente"
        if self.region_repo.find_zone_record(zone_id).await?.is_none() {
            return Err(AppError::ZoneNotFound(zone_id.to_string()));
        }
        self.supply_repo.list_zone_supplies(zone_id).await
    }

    /// Substitui a lista de suprimentos da zona.
    pub async fn update_zone_supplies(
        &self,
        session: &Session,
        zone_id: &str,
        inputs: &[ZoneSupplyInput],
    ) -> Result<Vec<ZoneSupply>, AppError> {
        ensure_unique_supply_types(inputs)?;

        let now = Utc::now();
        let supplies: Vec<ZoneSupply> = inputs
            .iter()
            .map(|input| ZoneSupply {
                supply_type_id: input.supply_type_id,
                quantity: input.quantity,
                need: input.need,
                last_updated: now,
            })
            .collect();

        let region_id = self.replace_supplies(zone_id, &supplies).await?;

        tracing::info!(
            zone_id = %zone_id,
            organization_id = %session.organization_id(),
            entries = supplies.len(),
            "Suprimentos da zona atualizados"
        );

        self.hub
            .publish(ZoneUpdate::new(zone_id, region_id, supplies.clone()));

        Ok(supplies)
    }

    /// Cria um registro zerado para cada tipo de suprimento (usado pelo seed).
    pub async fn initialize_zone_supplies(&self, zone_id: &str) -> Result<Vec<ZoneSupply>, AppError> {
        let now = Utc::now();
        let supplies: Vec<ZoneSupply> = self
            .supply_repo
            .list_supply_types()
            .await?
            .into_iter()
            .map(|supply_type| ZoneSupply {
                supply_type_id: supply_type.id,
                quantity: 0,
                need: 0,
                last_updated: now,
            })
            .collect();

        self.replace_supplies(zone_id, &supplies).await?;
        Ok(supplies)
    }

    // Troca tudo numa transação, com a zona travada. Devolve a região da zona.
    async fn replace_supplies(&self, zone_id: &str, supplies: &[ZoneSupply]) -> Result<String, AppError> {
        let mut tx = self.pool.begin().await?;

        let region_id = self
            .region_repo
            .lock_zone(&mut *tx, zone_id)
            .await?
            .ok_or_else(|| AppError::ZoneNotFound(zone_id.to_string()))?;

        self.supply_repo.delete_zone_supplies(&mut *tx, zone_id).await?;
        for supply in supplies {
            self.supply_repo.upsert_zone_supply(&mut *tx, zone_id, supply).await?;
        }

        tx.commit().await?;
        Ok(region_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn input(id: Uuid) -> ZoneSupplyInput {
        ZoneSupplyInput { supply_type_id: id, quantity: 1, need: 1 }
    }

    #[test]
    fn accepts_distinct_supply_types() {
        assert!(ensure_unique_supply_types(&[input(Uuid::new_v4()), input(Uuid::new_v4())]).is_ok());
    }

    #[test]
    fn rejects_repeated_supply_type() {
        let food = Uuid::new_v4();
        let result = ensure_unique_supply_types(&[input(food), input(Uuid::new_v4()), input(food)]);
        assert!(matches!(result, Err(AppError::DuplicateSupplyType(id)) if id == food));
    }
}
