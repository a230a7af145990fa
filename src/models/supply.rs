// src/models/supply.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Categorias básicas criadas pelo seed.
pub const BASIC_SUPPLY_TYPES: [&str; 5] = ["Food", "Water", "Medical", "Shelter", "Hygiene"];

// --- Tipo de Suprimento (dados de referência) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyType {
    pub id: Uuid,
    pub name: String,
}

// --- Suprimento de uma zona ---
// Um por (zona, tipo de suprimento).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSupply {
    pub supply_type_id: Uuid,
    pub quantity: i64,
    pub need: i64,
    pub last_updated: DateTime<Utc>,
}

// Linha crua de `zone_supplies`, usada ao carregar várias zonas de uma vez
#[derive(Debug, Clone, FromRow)]
pub struct ZoneSupplyRow {
    pub zone_id: String,
    pub supply_type_id: Uuid,
    pub quantity: i64,
    pub need: i64,
    pub last_updated: DateTime<Utc>,
}

impl From<ZoneSupplyRow> for ZoneSupply {
    fn from(row: ZoneSupplyRow) -> Self {
        Self {
            supply_type_id: row.supply_type_id,
            quantity: row.quantity,
            need: row.need,
            last_updated: row.last_updated,
        }
    }
}

// ---
// Payload: substituição da lista de suprimentos de uma zona
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSupplyInput {
    pub supply_type_id: Uuid,
    #[validate(range(min = 0, message = "validation.quantity_negative"))]
    pub quantity: i64,
    #[validate(range(min = 0, message = "validation.need_negative"))]
    pub need: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZoneSuppliesPayload {
    #[validate(nested)]
    pub supplies: Vec<ZoneSupplyInput>,
}
