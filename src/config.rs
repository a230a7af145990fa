// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{DonationRepository, OrganizationRepository, RegionRepository, SupplyRepository, TokenRepository},
    services::{
        auth::AuthService,
        donation_service::DonationService,
        live::ZoneUpdateHub,
        map_service::MapService,
        provider::{PgRegionProvider, RegionDataProvider},
        supply_service::SupplyService,
    },
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_REGION_CODE: &str = "PS";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub default_region_code: String,
    pub max_connections: u32,
    pub geoapify_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            default_region_code: env::var("DEFAULT_REGION_CODE")
                .unwrap_or_else(|_| DEFAULT_REGION_CODE.to_string()),
            max_connections,
            geoapify_api_key: env::var("GEOAPIFY_API_KEY").ok().filter(|k| !k.is_empty()),
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub i18n_store: I18nStore,
    pub hub: ZoneUpdateHub,
    pub auth_service: AuthService,
    pub map_service: MapService,
    pub supply_service: SupplyService,
    pub donation_service: DonationService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = config.connect().await?;

        let provider = Arc::new(PgRegionProvider::new(
            RegionRepository::new(db_pool.clone()),
            SupplyRepository::new(db_pool.clone()),
        ));

        Ok(Self::with_provider(config, db_pool, provider))
    }

    // --- Monta o gráfico de dependências ---
    // Separado do `new` para os testes trocarem o provider do mapa.
    pub fn with_provider(
        config: Config,
        db_pool: PgPool,
        provider: Arc<dyn RegionDataProvider>,
    ) -> Self {
        let hub = ZoneUpdateHub::new();

        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let region_repo = RegionRepository::new(db_pool.clone());
        let supply_repo = SupplyRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            organization_repo.clone(),
            TokenRepository::new(db_pool.clone()),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let map_service = MapService::new(provider, config.default_region_code.clone());
        let supply_service = SupplyService::new(
            supply_repo.clone(),
            region_repo.clone(),
            hub.clone(),
            db_pool.clone(),
        );
        let donation_service = DonationService::new(
            DonationRepository::new(db_pool.clone()),
            organization_repo,
            region_repo,
            supply_repo,
            hub.clone(),
            db_pool.clone(),
        );

        Self {
            db_pool,
            config,
            i18n_store: I18nStore::default(),
            hub,
            auth_service,
            map_service,
            supply_service,
            donation_service,
        }
    }
}
