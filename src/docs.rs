// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,

        // --- Organizations ---
        handlers::organizations::get_me,
        handlers::organizations::my_donations,
        handlers::organizations::my_region,

        // --- Regions / mapa ---
        handlers::regions::list_regions,
        handlers::regions::get_region,
        handlers::regions::list_zones,
        handlers::regions::get_map,

        // --- Zones / suprimentos ---
        handlers::zones::list_supply_types,
        handlers::zones::get_zone,
        handlers::zones::get_zone_supplies,
        handlers::zones::update_zone_supplies,

        // --- Donations ---
        handlers::donations::create_donation,

        // --- Live ---
        handlers::live::live_ws,
    ),
    components(
        schemas(
            // --- Organizations ---
            models::organization::Organization,
            models::organization::RegisterOrganizationPayload,
            models::organization::LoginPayload,
            models::organization::AuthResponse,

            // --- Regions ---
            models::region::Region,
            models::region::Zone,
            models::map::FeatureCollection,
            models::map::Feature,
            models::map::FeatureProperties,
            models::map::ZoneSummary,

            // --- Supplies ---
            models::supply::SupplyType,
            models::supply::ZoneSupply,
            models::supply::ZoneSupplyInput,
            models::supply::UpdateZoneSuppliesPayload,

            // --- Donations ---
            models::donation::DonationStatus,
            models::donation::Donation,
            models::donation::CreateDonationPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro e login de organizações"),
        (name = "Organizations", description = "Dados da organização logada"),
        (name = "Regions", description = "Regiões e mapa colorido por abastecimento"),
        (name = "Zones", description = "Zonas e seus suprimentos"),
        (name = "Supplies", description = "Tipos de suprimento"),
        (name = "Donations", description = "Registro de doações"),
        (name = "Live", description = "Atualizações em tempo real via WebSocket")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
