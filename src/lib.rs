//src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

/// Monta todas as rotas da API.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas, menos o logout)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/logout", post(handlers::auth::logout))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let organization_routes = Router::new()
        .route("/me", get(handlers::organizations::get_me))
        .route("/me/donations", get(handlers::organizations::my_donations))
        .route("/me/region", get(handlers::organizations::my_region))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let region_routes = Router::new()
        .route("/", get(handlers::regions::list_regions))
        .route("/{code}", get(handlers::regions::get_region))
        .route("/{code}/zones", get(handlers::regions::list_zones))
        .route("/{code}/map", get(handlers::regions::get_map));

    // Leitura é pública; só a escrita exige token
    let zone_routes = Router::new()
        .route("/{zone_id}", get(handlers::zones::get_zone))
        .route("/{zone_id}/supplies", get(handlers::zones::get_zone_supplies))
        .merge(
            Router::new()
                .route("/{zone_id}/supplies", put(handlers::zones::update_zone_supplies))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let donation_routes = Router::new()
        .route("/", post(handlers::donations::create_donation))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/supply-types", get(handlers::zones::list_supply_types))
        .route("/api/live/ws", get(handlers::live::live_ws))
        .nest("/api/auth", auth_routes)
        .nest("/api/organizations", organization_routes)
        .nest("/api/regions", region_routes)
        .nest("/api/zones", zone_routes)
        .nest("/api/donations", donation_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
