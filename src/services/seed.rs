// src/services/seed.rs

use anyhow::Context;
use serde::Deserialize;

use crate::{
    db::{RegionRepository, SupplyRepository},
    models::{
        country::Country,
        region::{NewZone, Region, DEFAULT_ZONE_TYPE},
        supply::BASIC_SUPPLY_TYPES,
    },
    services::supply_service::SupplyService,
};

pub const GEOAPIFY_BOUNDARIES_URL: &str = "https://api.geoapify.com/v1/boundaries/consists-of";

// --- Resposta da API de fronteiras (só o que usamos) ---
#[derive(Debug, Deserialize)]
struct BoundaryResponse {
    #[serde(default)]
    features: Vec<BoundaryFeature>,
}

#[derive(Debug, Deserialize)]
struct BoundaryFeature {
    properties: BoundaryProperties,
    geometry: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct BoundaryProperties {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// "Khan Younis" em "PS" -> "PS-khan-younis"
pub fn zone_slug(region_code: &str, zone_name: &str) -> String {
    let mut slug = String::with_capacity(zone_name.len());
    let mut in_whitespace = false;

    for ch in zone_name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            slug.extend(ch.to_lowercase());
        }
    }

    format!("{region_code}-{slug}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeedOptions {
    pub skip_supply_types: bool,
    pub init_supplies: bool,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub supply_types: usize,
    pub regions: usize,
    pub zones: usize,
    pub failed_countries: Vec<String>,
}

pub struct Seeder {
    client: reqwest::Client,
    boundaries_url: String,
    api_key: String,
    region_repo: RegionRepository,
    supply_repo: SupplyRepository,
    supply_service: SupplyService,
}

impl Seeder {
    pub fn new(
        client: reqwest::Client,
        boundaries_url: String,
        api_key: String,
        region_repo: RegionRepository,
        supply_repo: SupplyRepository,
        supply_service: SupplyService,
    ) -> Self {
        Self { client, boundaries_url, api_key, region_repo, supply_repo, supply_service }
    }

    pub async fn run(&self, countries: &[&Country], options: SeedOptions) -> anyhow::Result<SeedReport> {
        let mut report = SeedReport::default();

        if !options.skip_supply_types {
            for name in BASIC_SUPPLY_TYPES {
                self.supply_repo
                    .ensure_supply_type(name)
                    .await
                    .with_context(|| format!("Falha ao criar o tipo de suprimento {name}"))?;
                report.supply_types += 1;
            }
            tracing::info!(count = report.supply_types, "Tipos de suprimento prontos");
        }

        // Um país com erro não derruba os demais
        for country in countries {
            match self.seed_country(country, options).await {
                Ok(zones) => {
                    report.regions += 1;
                    report.zones += zones;
                    tracing::info!(country = %country.name, zones, "País semeado");
                }
                Err(e) => {
                    tracing::error!(country = %country.name, error = ?e, "Falha ao semear país");
                    report.failed_countries.push(country.code.to_string());
                }
            }
        }

        Ok(report)
    }

    async fn fetch_boundaries(&self, country: &Country) -> anyhow::Result<Vec<BoundaryFeature>> {
        let response = self
            .client
            .get(&self.boundaries_url)
            .query(&[
                ("id", country.place_id),
                ("geometry", "geometry_1000"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Falha ao buscar fronteiras de {}", country.name))?
            .error_for_status()
            .with_context(|| format!("API de fronteiras recusou {}", country.name))?;

        let body: BoundaryResponse = response
            .json()
            .await
            .with_context(|| format!("Resposta inválida para {}", country.name))?;
        Ok(body.features)
    }

    async fn seed_country(&self, country: &Country, options: SeedOptions) -> anyhow::Result<usize> {
        let features = self.fetch_boundaries(country).await?;

        let mut zone_refs = Vec::with_capacity(features.len());
        for feature in features {
            let Some(zone_name) = feature.properties.name else {
                tracing::warn!(country = %country.code, "Fronteira sem nome, ignorada");
                continue;
            };

            let zone_id = zone_slug(country.code, &zone_name);
            let zone = NewZone {
                boundary_id: format!("boundary-{zone_id}"),
                id: zone_id.clone(),
                name: zone_name,
                region_id: country.code.to_string(),
                zone_type: feature
                    .properties
                    .kind
                    .unwrap_or_else(|| DEFAULT_ZONE_TYPE.to_string()),
                geometry: serde_json::to_string(&feature.geometry)?,
            };

            self.region_repo.upsert_zone_with_boundary(&zone).await?;
            if options.init_supplies {
                self.supply_service.initialize_zone_supplies(&zone_id).await?;
            }

            tracing::debug!(zone_id = %zone_id, "Zona criada");
            zone_refs.push(zone_id);
        }

        let zones = zone_refs.len();
        let region = Region {
            id: country.code.to_string(),
            code: country.code.to_string(),
            name: country.name.to_string(),
            center: country.center.to_vec(),
            zoom: country.zoom,
            zone_refs,
        };
        self.region_repo.upsert_region(&region).await?;

        Ok(zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_whitespace_and_lowercases() {
        assert_eq!(zone_slug("PS", "Khan  Younis"), "PS-khan-younis");
        assert_eq!(zone_slug("SD", "North\tDarfur State"), "SD-north-darfur-state");
    }

    #[test]
    fn slug_keeps_non_ascii_names() {
        assert_eq!(zone_slug("EG", "Al Qāhirah"), "EG-al-qāhirah");
    }

    #[test]
    fn parses_boundary_features() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "Rafah", "type": "district"},
                 "geometry": {"type": "Polygon", "coordinates": []}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": []}}
            ]
        }"#;

        let parsed: BoundaryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.features.len(), 2);
        assert_eq!(parsed.features[0].properties.name.as_deref(), Some("Rafah"));
        assert_eq!(parsed.features[0].properties.kind.as_deref(), Some("district"));
        assert!(parsed.features[1].properties.name.is_none());
    }
}
