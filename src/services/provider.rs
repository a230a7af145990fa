// src/services/provider.rs

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{RegionRepository, SupplyRepository},
    models::{
        region::{Region, Zone, ZoneRecord},
        supply::{ZoneSupply, ZoneSupplyRow},
    },
};

/// Acesso de leitura a regiões e zonas.
///
/// O mapa e a lista de zonas só dependem deste trait, o que permite trocar o
/// Postgres por uma implementação em memória nos testes.
#[async_trait]
pub trait RegionDataProvider: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<Region>, AppError>;

    async fn region_by_code(&self, code: &str) -> Result<Option<Region>, AppError>;

    /// Zonas da região, na ordem de `zone_refs`. Região desconhecida -> lista vazia.
    async fn zones_for_region(&self, code: &str) -> Result<Vec<Zone>, AppError>;

    async fn zone(&self, zone_id: &str) -> Result<Option<Zone>, AppError>;

    /// A zona está cadastrada, mesmo que a geometria não resolva.
    async fn zone_exists(&self, zone_id: &str) -> Result<bool, AppError>;
}

/// Junta a geometria (texto JSON) e os suprimentos a uma zona.
///
/// Zona sem fronteira ou com geometria inválida é descartada com um aviso no log.
pub fn resolve_zone(record: ZoneRecord, supplies: Vec<ZoneSupply>) -> Option<Zone> {
    let Some(raw_geometry) = record.geometry.as_deref() else {
        tracing::warn!(zone_id = %record.id, boundary_id = ?record.boundary_id, "Zona sem fronteira, ignorada");
        return None;
    };

    match serde_json::from_str::<serde_json::Value>(raw_geometry) {
        Ok(boundaries) => Some(Zone {
            id: record.id,
            name: record.name,
            region_id: record.region_id,
            zone_type: record.zone_type,
            boundaries,
            supplies,
        }),
        Err(e) => {
            tracing::warn!(zone_id = %record.id, error = %e, "Geometria inválida, zona ignorada");
            None
        }
    }
}

/// Resolve várias zonas de uma vez, distribuindo as linhas de suprimento.
pub fn resolve_zones(records: Vec<ZoneRecord>, supply_rows: Vec<ZoneSupplyRow>) -> Vec<Zone> {
    let mut by_zone: HashMap<String, Vec<ZoneSupply>> = HashMap::new();
    for row in supply_rows {
        by_zone.entry(row.zone_id.clone()).or_default().push(row.into());
    }

    records
        .into_iter()
        .filter_map(|record| {
            let supplies = by_zone.remove(&record.id).unwrap_or_default();
            resolve_zone(record, supplies)
        })
        .collect()
}

// ---
// Implementação Postgres
// ---
#[derive(Clone)]
pub struct PgRegionProvider {
    region_repo: RegionRepository,
    supply_repo: SupplyRepository,
}

impl PgRegionProvider {
    pub fn new(region_repo: RegionRepository, supply_repo: SupplyRepository) -> Self {
        Self { region_repo, supply_repo }
    }
}

#[async_trait]
impl RegionDataProvider for PgRegionProvider {
    async fn list_regions(&self) -> Result<Vec<Region>, AppError> {
        self.region_repo.list_regions().await
    }

    async fn region_by_code(&self, code: &str) -> Result<Option<Region>, AppError> {
        self.region_repo.find_region_by_code(code).await
    }

    async fn zones_for_region(&self, code: &str) -> Result<Vec<Zone>, AppError> {
        let Some(region) = self.region_repo.find_region_by_code(code).await? else {
            return Ok(Vec::new());
        };
        if region.zone_refs.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.region_repo.find_zone_records(&region.zone_refs).await?;
        let supply_rows = self.supply_repo.supplies_for_zones(&region.zone_refs).await?;

        let zones = resolve_zones(records, supply_rows);
        tracing::debug!(region = %code, zones = zones.len(), "Zonas carregadas");
        Ok(zones)
    }

    async fn zone(&self, zone_id: &str) -> Result<Option<Zone>, AppError> {
        let Some(record) = self.region_repo.find_zone_record(zone_id).await? else {
            return Ok(None);
        };
        let supplies = self.supply_repo.list_zone_supplies(zone_id).await?;
        Ok(resolve_zone(record, supplies))
    }

    async fn zone_exists(&self, zone_id: &str) -> Result<bool, AppError> {
        Ok(self.region_repo.find_zone_record(zone_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(id: &str, geometry: Option<&str>) -> ZoneRecord {
        ZoneRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            region_id: "PS".to_string(),
            zone_type: "district".to_string(),
            boundary_id: geometry.map(|_| format!("boundary-{id}")),
            geometry: geometry.map(str::to_string),
        }
    }

    const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#;

    #[test]
    fn malformed_geometry_skips_only_that_zone() {
        let records = vec![
            record("PS-a", Some(SQUARE)),
            record("PS-b", Some("{not json")),
            record("PS-c", Some(SQUARE)),
        ];

        let zones = resolve_zones(records, vec![]);
        let ids: Vec<_> = zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["PS-a", "PS-c"]);
    }

    #[test]
    fn zone_without_boundary_is_skipped() {
        assert!(resolve_zone(record("PS-x", None), vec![]).is_none());
    }

    #[test]
    fn supplies_are_attached_to_their_zone() {
        let food = Uuid::new_v4();
        let rows = vec![
            ZoneSupplyRow {
                zone_id: "PS-c".into(),
                supply_type_id: food,
                quantity: 10,
                need: 20,
                last_updated: Utc::now(),
            },
        ];

        let zones = resolve_zones(vec![record("PS-a", Some(SQUARE)), record("PS-c", Some(SQUARE))], rows);
        assert!(zones[0].supplies.is_empty());
        assert_eq!(zones[1].supplies.len(), 1);
        assert_eq!(zones[1].supplies[0].supply_type_id, food);
        assert_eq!(zones[1].boundaries["type"], "Polygon");
    }
}
