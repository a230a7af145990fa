// src/models/region.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::supply::ZoneSupply;

pub const DEFAULT_ZONE_TYPE: &str = "Region";

// ---
// 1. Região (país / cidade)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub code: String,
    pub name: String,
    /// [longitude, latitude]
    pub center: Vec<f64>,
    pub zoom: f64,
    pub zone_refs: Vec<String>,
}

// ---
// 2. Linha de zona já com a geometria (JOIN em `boundaries`)
// ---
// A geometria ainda é texto; quem resolve é o provider.
#[derive(Debug, Clone, FromRow)]
pub struct ZoneRecord {
    pub id: String,
    pub name: String,
    pub region_id: String,
    pub zone_type: String,
    pub boundary_id: Option<String>,
    pub geometry: Option<String>,
}

// ---
// 3. Zona resolvida (geometria + suprimentos)
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub region_id: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    #[schema(value_type = Object)]
    pub boundaries: serde_json::Value,
    pub supplies: Vec<ZoneSupply>,
}

// Usado pelo seed para gravar zonas novas
#[derive(Debug, Clone)]
pub struct NewZone {
    pub id: String,
    pub name: String,
    pub region_id: String,
    pub zone_type: String,
    pub boundary_id: String,
    pub geometry: String,
}
