// src/models/donation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "donation_status", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum DonationStatus {
    Pending,
    Approved,
    Delivered,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub zone_id: String,
    pub supply_type_id: Uuid,
    pub quantity: i64,
    pub status: DonationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Formulário de doação
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationPayload {
    #[validate(length(min = 1, message = "validation.zone_required"))]
    pub zone_id: String,

    pub supply_type_id: Uuid,

    #[validate(range(min = 1, message = "validation.quantity_min"))]
    pub quantity: i64,

    #[validate(length(max = 1000, message = "validation.notes_too_long"))]
    pub notes: Option<String>,
}
