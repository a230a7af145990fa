// tests/api.rs
//
// Rotas exercitadas com um provider em memória e uma pool preguiçosa:
// nenhum teste aqui abre conexão com o Postgres.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use aidmap::{
    build_router,
    common::error::AppError,
    config::{AppState, Config},
    models::{
        region::{Region, Zone},
        supply::ZoneSupply,
    },
    services::provider::RegionDataProvider,
};

struct InMemoryProvider {
    regions: Vec<Region>,
    zones: Vec<Zone>,
}

#[async_trait]
impl RegionDataProvider for InMemoryProvider {
    async fn list_regions(&self) -> Result<Vec<Region>, AppError> {
        Ok(self.regions.clone())
    }

    async fn region_by_code(&self, code: &str) -> Result<Option<Region>, AppError> {
        Ok(self.regions.iter().find(|r| r.code == code).cloned())
    }

    async fn zones_for_region(&self, code: &str) -> Result<Vec<Zone>, AppError> {
        Ok(self.zones.iter().filter(|z| z.region_id == code).cloned().collect())
    }

    async fn zone(&self, zone_id: &str) -> Result<Option<Zone>, AppError> {
        Ok(self.zones.iter().find(|z| z.id == zone_id).cloned())
    }

    async fn zone_exists(&self, zone_id: &str) -> Result<bool, AppError> {
        Ok(self.zones.iter().any(|z| z.id == zone_id))
    }
}

struct Fixture {
    app: Router,
    food: Uuid,
    water: Uuid,
}

fn supply(supply_type_id: Uuid, quantity: i64, need: i64) -> ZoneSupply {
    ZoneSupply { supply_type_id, quantity, need, last_updated: Utc::now() }
}

fn zone(id: &str, supplies: Vec<ZoneSupply>) -> Zone {
    Zone {
        id: id.into(),
        name: id.trim_start_matches("PS-").into(),
        region_id: "PS".into(),
        zone_type: "district".into(),
        boundaries: json!({"type": "Polygon", "coordinates": [[[34.2, 31.3], [34.3, 31.3], [34.3, 31.2], [34.2, 31.3]]]}),
        supplies,
    }
}

fn fixture() -> Fixture {
    let food = Uuid::new_v4();
    let water = Uuid::new_v4();

    let provider = InMemoryProvider {
        regions: vec![Region {
            id: "PS".into(),
            code: "PS".into(),
            name: "Gaza City".into(),
            center: vec![34.4667, 31.5017],
            zoom: 11.5,
            zone_refs: vec!["PS-rafah".into(), "PS-khan-younis".into()],
        }],
        zones: vec![
            // comida sobrando, água em falta
            zone("PS-rafah", vec![supply(food, 150, 100), supply(water, 20, 100)]),
            zone("PS-khan-younis", vec![]),
        ],
    };

    let config = Config {
        database_url: "postgres://localhost/aidmap_test".into(),
        jwt_secret: "test-secret".into(),
        bind_addr: "127.0.0.1:0".into(),
        default_region_code: "PS".into(),
        max_connections: 1,
        geoapify_api_key: None,
    };
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();

    let state = AppState::with_provider(config, pool, Arc::new(provider));
    Fixture { app: build_router(state), food, water }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_check_answers_ok() {
    let response = fixture().app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn lists_regions() {
    let (status, body) = send(fixture().app, get("/api/regions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["code"], "PS");
    assert_eq!(body[0]["zoneRefs"][1], "PS-khan-younis");
}

#[tokio::test]
async fn map_paints_zones_by_worst_supply() {
    let (status, body) = send(fixture().app, get("/api/regions/PS/map")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);

    // água a 20% puxa Rafah para o vermelho
    assert_eq!(features[0]["properties"]["id"], "PS-rafah");
    assert_eq!(features[0]["properties"]["fillColor"], "#FF0000");
    // zona sem suprimentos não tem falta registrada
    assert_eq!(features[1]["properties"]["fillColor"], "#00FF00");
    assert_eq!(features[0]["geometry"]["type"], "Polygon");
}

#[tokio::test]
async fn map_filter_uses_only_selected_supply() {
    let fx = fixture();
    let uri = format!("/api/regions/PS/map?supplyType={}", fx.food);
    let (status, body) = send(fx.app, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"][0]["properties"]["fillColor"], "#00FF00");
}

#[tokio::test]
async fn zone_list_reports_ratio_for_filter() {
    let fx = fixture();
    let uri = format!("/api/regions/PS/zones?supplyType={}", fx.water);
    let (status, body) = send(fx.app, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "PS-rafah");
    assert_eq!(body[0]["ratio"], 0.2);
    assert_eq!(body[0]["fillColor"], "#FF0000");
    assert!(body[1]["ratio"].is_null());
}

#[tokio::test]
async fn unknown_region_is_404_in_requested_language() {
    let (status, body) = send(fixture().app, get("/api/regions/XX/map")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Region 'XX' not found.");

    let request = Request::builder()
        .uri("/api/regions/XX")
        .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(fixture().app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Região 'XX' não encontrada.");
}

#[tokio::test]
async fn zone_lookup() {
    let (status, body) = send(fixture().app, get("/api/zones/PS-rafah")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "district");
    assert_eq!(body["supplies"].as_array().unwrap().len(), 2);

    let (status, _) = send(fixture().app, get("/api/zones/PS-nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn donation_requires_token() {
    let fx = fixture();
    let payload = json!({"zoneId": "PS-rafah", "supplyTypeId": fx.water, "quantity": 10});

    let (status, body) = send(fx.app.clone(), post_json("/api/donations", payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing or invalid authentication token.");

    let mut request = post_json("/api/donations", payload);
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer not-a-jwt".parse().unwrap());
    let (status, _) = send(fx.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_reject_anonymous_calls() {
    for (method, uri) in [
        ("GET", "/api/organizations/me"),
        ("GET", "/api/organizations/me/region"),
        ("POST", "/api/auth/logout"),
        ("PUT", "/api/zones/PS-rafah/supplies"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"supplies": []}"#))
            .unwrap();
        let (status, _) = send(fixture().app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn register_rejects_invalid_payload() {
    let payload = json!({
        "organizationName": "Relief Now",
        "email": "not-an-email",
        "password": "secret1",
        "confirmPassword": "secret2",
        "countries": ["ps"]
    });

    let (status, body) = send(fixture().app, post_json("/api/auth/register", payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "One or more fields are invalid.");
    let details = body["details"].as_object().unwrap();
    assert!(details.contains_key("email"));
    assert!(details.contains_key("countries"));
    assert_eq!(details["email"][0], "The e-mail provided is invalid.");
}

#[tokio::test]
async fn field_details_follow_accept_language() {
    let payload = json!({
        "organizationName": "Relief Now",
        "email": "not-an-email",
        "password": "secret1",
        "confirmPassword": "secret1"
    });
    let mut request = post_json("/api/auth/register", payload);
    request
        .headers_mut()
        .insert(header::ACCEPT_LANGUAGE, "pt-BR".parse().unwrap());

    let (status, body) = send(fixture().app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Um ou mais campos são inválidos.");
    assert_eq!(body["details"]["email"][0], "O e-mail fornecido é inválido.");
}

#[tokio::test]
async fn swagger_document_is_served() {
    let (status, body) = send(fixture().app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/donations"].is_object());
}
