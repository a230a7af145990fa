// src/models/map.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::supply::ZoneSupply;

// Filtro opcional de tipo de suprimento (?supplyType=<uuid>)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SupplyFilterQuery {
    pub supply_type: Option<Uuid>,
}

/// GeoJSON consumido pelo widget de mapa.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { kind: "FeatureCollection", features }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Feature {
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: &'static str,
    pub properties: FeatureProperties,
    #[schema(value_type = Object)]
    pub geometry: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub fill_color: String,
    pub supplies: Vec<ZoneSupply>,
}

// Item da lista lateral de zonas
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub fill_color: String,
    /// Razão quantidade/necessidade que definiu a cor (None = necessidade coberta).
    pub ratio: Option<f64>,
}
