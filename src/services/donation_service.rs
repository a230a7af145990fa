// src/services/donation_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{DonationRepository, OrganizationRepository, RegionRepository, SupplyRepository},
    models::{
        donation::{CreateDonationPayload, Donation, DonationStatus},
        organization::Session,
        supply::ZoneSupply,
    },
    services::live::{ZoneUpdate, ZoneUpdateHub},
};

/// Soma a doação ao suprimento da zona.
///
/// Se a zona ainda não tem registro para o tipo, cria um com necessidade 0.
/// Devolve o registro que mudou. Uma soma que estoura `i64` vira erro de
/// validação em `quantity` e a lista fica intacta.
pub fn apply_donation(
    supplies: &mut Vec<ZoneSupply>,
    supply_type_id: Uuid,
    quantity: i64,
    now: DateTime<Utc>,
) -> Result<ZoneSupply, AppError> {
    match supplies.iter_mut().find(|s| s.supply_type_id == supply_type_id) {
        Some(existing) => {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or_else(quantity_overflow)?;
            existing.last_updated = now;
            Ok(existing.clone())
        }
        None => {
            let created = ZoneSupply {
                supply_type_id,
                quantity,
                need: 0,
                last_updated: now,
            };
            supplies.push(created.clone());
            Ok(created)
        }
    }
}

fn quantity_overflow() -> AppError {
    let mut err = ValidationError::new("range");
    err.message = Some("validation.quantity_overflow".into());
    let mut errors = ValidationErrors::new();
    errors.add("quantity", err);
    AppError::ValidationError(errors)
}

#[derive(Clone)]
pub struct DonationService {
    donation_repo: DonationRepository,
    organization_repo: OrganizationRepository,
    region_repo: RegionRepository,
    supply_repo: SupplyRepository,
    hub: ZoneUpdateHub,
    pool: PgPool,
}

impl DonationService {
    pub fn new(
        donation_repo: DonationRepository,
        organization_repo: OrganizationRepository,
        region_repo: RegionRepository,
        supply_repo: SupplyRepository,
        hub: ZoneUpdateHub,
        pool: PgPool,
    ) -> Self {
        Self { donation_repo, organization_repo, region_repo, supply_repo, hub, pool }
    }

    /// LÓGICA DE NEGÓCIO: registra a doação, atualiza a organização e soma o
    /// suprimento da zona numa única transação. Qualquer falha desfaz tudo.
    pub async fn record_donation(
        &self,
        session: &Session,
        payload: &CreateDonationPayload,
    ) -> Result<Donation, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Trava a zona (doações concorrentes na mesma zona ficam em fila)
        let region_id = self
            .region_repo
            .lock_zone(&mut *tx, &payload.zone_id)
            .await?
            .ok_or_else(|| AppError::ZoneNotFound(payload.zone_id.clone()))?;

        // 2. O tipo de suprimento precisa existir
        self.supply_repo
            .find_supply_type(&mut *tx, payload.supply_type_id)
            .await?
            .ok_or(AppError::SupplyTypeNotFound(payload.supply_type_id))?;

        // 3. Registro da doação
        let donation = self
            .donation_repo
            .create(
                &mut *tx,
                session.organization_id(),
                &payload.zone_id,
                payload.supply_type_id,
                payload.quantity,
                DonationStatus::Delivered,
                payload.notes.as_deref(),
            )
            .await?;

        // 4. Organização: última região + lista de doações
        self.organization_repo
            .register_donation(&mut *tx, session.organization_id(), &region_id, donation.id)
            .await?;

        // 5. Suprimento da zona (incrementa ou cria)
        let mut supplies = self
            .supply_repo
            .get_zone_supplies(&mut *tx, &payload.zone_id)
            .await?;
        let changed = apply_donation(&mut supplies, payload.supply_type_id, payload.quantity, Utc::now())?;
        self.supply_repo
            .upsert_zone_supply(&mut *tx, &payload.zone_id, &changed)
            .await?;

        tx.commit().await?;

        tracing::info!(
            donation_id = %donation.id,
            organization_id = %session.organization_id(),
            zone_id = %payload.zone_id,
            quantity = payload.quantity,
            "Doação registrada"
        );

        self.hub
            .publish(ZoneUpdate::new(payload.zone_id.clone(), region_id, supplies));

        Ok(donation)
    }

    pub async fn list_for_session(&self, session: &Session) -> Result<Vec<Donation>, AppError> {
        self.donation_repo
            .list_for_organization(session.organization_id())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_existing_supply() {
        let food = Uuid::new_v4();
        let before = Utc::now() - chrono::Duration::hours(1);
        let now = Utc::now();
        let mut supplies = vec![ZoneSupply {
            supply_type_id: food,
            quantity: 10,
            need: 50,
            last_updated: before,
        }];

        let changed = apply_donation(&mut supplies, food, 15, now).unwrap();

        assert_eq!(supplies.len(), 1);
        assert_eq!(changed.quantity, 25);
        assert_eq!(changed.need, 50);
        assert_eq!(supplies[0].last_updated, now);
    }

    #[test]
    fn oversized_donation_is_rejected_without_touching_stock() {
        let food = Uuid::new_v4();
        let before = Utc::now() - chrono::Duration::hours(1);
        let mut supplies = vec![ZoneSupply {
            supply_type_id: food,
            quantity: 10,
            need: 50,
            last_updated: before,
        }];

        let result = apply_donation(&mut supplies, food, i64::MAX, Utc::now());

        match result {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.field_errors().contains_key("quantity"));
            }
            other => panic!("esperava erro de validação, veio {other:?}"),
        }
        assert_eq!(supplies[0].quantity, 10);
        assert_eq!(supplies[0].last_updated, before);
    }

    #[test]
    fn largest_quantity_fits_in_empty_slot() {
        let mut supplies = Vec::new();
        let changed = apply_donation(&mut supplies, Uuid::new_v4(), i64::MAX, Utc::now()).unwrap();
        assert_eq!(changed.quantity, i64::MAX);
    }

    #[test]
    fn creates_missing_supply_with_zero_need() {
        let food = Uuid::new_v4();
        let water = Uuid::new_v4();
        let now = Utc::now();
        let mut supplies = vec![ZoneSupply {
            supply_type_id: food,
            quantity: 10,
            need: 50,
            last_updated: now,
        }];

        let changed = apply_donation(&mut supplies, water, 7, now).unwrap();

        assert_eq!(supplies.len(), 2);
        assert_eq!(changed.supply_type_id, water);
        assert_eq!(changed.quantity, 7);
        assert_eq!(changed.need, 0);
        // Comida intacta
        assert_eq!(supplies[0].quantity, 10);
    }

    #[test]
    fn keeps_supply_type_ids_unique() {
        let food = Uuid::new_v4();
        let mut supplies = Vec::new();
        let now = Utc::now();

        apply_donation(&mut supplies, food, 1, now).unwrap();
        apply_donation(&mut supplies, food, 2, now).unwrap();

        assert_eq!(supplies.len(), 1);
        assert_eq!(supplies[0].quantity, 3);
    }
}
