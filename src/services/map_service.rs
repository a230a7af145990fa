// src/services/map_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        map::{Feature, FeatureCollection, FeatureProperties, ZoneSummary},
        organization::Session,
        region::{Region, Zone, DEFAULT_ZONE_TYPE},
    },
    services::{provider::RegionDataProvider, zone_aggregator::aggregate},
};

/// Monta os dados do mapa (GeoJSON + lista lateral) a partir do provider.
#[derive(Clone)]
pub struct MapService {
    provider: Arc<dyn RegionDataProvider>,
    default_region_code: String,
}

impl MapService {
    pub fn new(provider: Arc<dyn RegionDataProvider>, default_region_code: String) -> Self {
        Self { provider, default_region_code }
    }

    pub async fn list_regions(&self) -> Result<Vec<Region>, AppError> {
        self.provider.list_regions().await
    }

    pub async fn region(&self, code: &str) -> Result<Region, AppError> {
        self.provider
            .region_by_code(code)
            .await?
            .ok_or_else(|| AppError::RegionNotFound(code.to_string()))
    }

    pub async fn zone(&self, zone_id: &str) -> Result<Zone, AppError> {
        self.provider
            .zone(zone_id)
            .await?
            .ok_or_else(|| AppError::ZoneNotFound(zone_id.to_string()))
    }

    /// Só confere o cadastro; não depende da geometria estar íntegra.
    pub async fn ensure_zone_exists(&self, zone_id: &str) -> Result<(), AppError> {
        if self.provider.zone_exists(zone_id).await? {
            Ok(())
        } else {
            Err(AppError::ZoneNotFound(zone_id.to_string()))
        }
    }

    // Região desconhecida é erro aqui (o provider devolveria lista vazia)
    async fn zones_of_existing_region(&self, code: &str) -> Result<Vec<Zone>, AppError> {
        self.region(code).await?;
        self.provider.zones_for_region(code).await
    }

    /// FeatureCollection pintada conforme o filtro de suprimento.
    pub async fn feature_collection(
        &self,
        code: &str,
        supply_filter: Option<Uuid>,
    ) -> Result<FeatureCollection, AppError> {
        let zones = self.zones_of_existing_region(code).await?;
        Ok(build_feature_collection(zones, supply_filter))
    }

    pub async fn zone_summaries(
        &self,
        code: &str,
        supply_filter: Option<Uuid>,
    ) -> Result<Vec<ZoneSummary>, AppError> {
        let zones = self.zones_of_existing_region(code).await?;
        Ok(zones
            .iter()
            .map(|zone| summarize_zone(zone, supply_filter))
            .collect())
    }

    /// Região em que o mapa abre: a da última doação da organização, se ainda
    /// existir; senão a região padrão.
    pub async fn preferred_region(&self, session: Option<&Session>) -> Result<Region, AppError> {
        let last_donation = session.and_then(|s| s.organization.last_donation_region.as_deref());

        if let Some(code) = last_donation {
            if let Some(region) = self.provider.region_by_code(code).await? {
                return Ok(region);
            }
            tracing::warn!(region = %code, "Região da última doação não existe mais, usando a padrão");
        }

        self.region(&self.default_region_code).await
    }
}

fn zone_type_or_default(zone: &Zone) -> String {
    if zone.zone_type.is_empty() {
        DEFAULT_ZONE_TYPE.to_string()
    } else {
        zone.zone_type.clone()
    }
}

pub fn build_feature_collection(zones: Vec<Zone>, supply_filter: Option<Uuid>) -> FeatureCollection {
    let features = zones
        .into_iter()
        .map(|zone| {
            let fill_color = aggregate(&zone.supplies, supply_filter).color().to_hex();
            let zone_type = zone_type_or_default(&zone);
            Feature {
                kind: "Feature",
                properties: FeatureProperties {
                    id: zone.id,
                    name: zone.name,
                    zone_type,
                    fill_color,
                    supplies: zone.supplies,
                },
                geometry: zone.boundaries,
            }
        })
        .collect();

    FeatureCollection::new(features)
}

pub fn summarize_zone(zone: &Zone, supply_filter: Option<Uuid>) -> ZoneSummary {
    let level = aggregate(&zone.supplies, supply_filter);
    ZoneSummary {
        id: zone.id.clone(),
        name: zone.name.clone(),
        zone_type: zone_type_or_default(zone),
        fill_color: level.color().to_hex(),
        ratio: level.ratio(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::supply::ZoneSupply;
    use chrono::Utc;
    use serde_json::json;

    fn zone(id: &str, zone_type: &str, supplies: Vec<ZoneSupply>) -> Zone {
        Zone {
            id: id.into(),
            name: id.into(),
            region_id: "PS".into(),
            zone_type: zone_type.into(),
            boundaries: json!({"type": "Point", "coordinates": [34.4, 31.5]}),
            supplies,
        }
    }

    fn supply(id: Uuid, quantity: i64, need: i64) -> ZoneSupply {
        ZoneSupply { supply_type_id: id, quantity, need, last_updated: Utc::now() }
    }

    #[test]
    fn feature_collection_has_geojson_shape() {
        let water = Uuid::new_v4();
        let fc = build_feature_collection(
            vec![zone("PS-a", "district", vec![supply(water, 40, 100)]), zone("PS-b", "", vec![])],
            None,
        );

        let value = serde_json::to_value(&fc).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["properties"]["fillColor"], "#FF0000");
        assert_eq!(value["features"][0]["properties"]["type"], "district");
        assert_eq!(value["features"][1]["properties"]["fillColor"], "#00FF00");
        assert_eq!(value["features"][1]["properties"]["type"], "Region");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
    }

    #[test]
    fn filter_changes_fill_color() {
        let food = Uuid::new_v4();
        let water = Uuid::new_v4();
        let zones = vec![zone("PS-a", "district", vec![supply(food, 200, 100), supply(water, 10, 100)])];

        let all = build_feature_collection(zones.clone(), None);
        let only_food = build_feature_collection(zones, Some(food));

        assert_eq!(all.features[0].properties.fill_color, "#FF0000");
        assert_eq!(only_food.features[0].properties.fill_color, "#00FF00");
    }

    // Zona cadastrada cuja geometria não resolve
    struct BrokenGeometryProvider;

    #[async_trait::async_trait]
    impl RegionDataProvider for BrokenGeometryProvider {
        async fn list_regions(&self) -> Result<Vec<Region>, AppError> {
            Ok(vec![])
        }

        async fn region_by_code(&self, _code: &str) -> Result<Option<Region>, AppError> {
            Ok(None)
        }

        async fn zones_for_region(&self, _code: &str) -> Result<Vec<Zone>, AppError> {
            Ok(vec![])
        }

        async fn zone(&self, _zone_id: &str) -> Result<Option<Zone>, AppError> {
            Ok(None)
        }

        async fn zone_exists(&self, zone_id: &str) -> Result<bool, AppError> {
            Ok(zone_id == "PS-broken")
        }
    }

    #[tokio::test]
    async fn registered_zone_exists_even_with_broken_geometry() {
        let service = MapService::new(Arc::new(BrokenGeometryProvider), "PS".into());

        assert!(service.ensure_zone_exists("PS-broken").await.is_ok());
        assert!(matches!(
            service.ensure_zone_exists("PS-nowhere").await,
            Err(AppError::ZoneNotFound(id)) if id == "PS-nowhere"
        ));
    }

    #[test]
    fn summary_reports_ratio() {
        let food = Uuid::new_v4();
        let summary = summarize_zone(&zone("PS-a", "district", vec![supply(food, 90, 100)]), Some(food));
        assert_eq!(summary.ratio, Some(0.9));
        assert_eq!(summary.fill_color, "#66FF00");
    }
}
