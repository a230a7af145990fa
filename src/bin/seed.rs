//src/bin/seed.rs
//! Popula tipos de suprimento, regiões e zonas a partir da API de fronteiras.
//!
//! cargo run --bin seed -- --country PS --country SD --init-supplies

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aidmap::{
    config::Config,
    db::{RegionRepository, SupplyRepository},
    models::country::{find_country, Country, COUNTRIES},
    services::{
        live::ZoneUpdateHub,
        seed::{SeedOptions, Seeder, GEOAPIFY_BOUNDARIES_URL},
        supply_service::SupplyService,
    },
};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Popula o banco com regiões, zonas e tipos de suprimento")]
struct Cli {
    /// Código do país (repetível). Sem nenhum, semeia o catálogo inteiro.
    #[arg(long = "country", value_name = "CODE")]
    countries: Vec<String>,

    /// Não recria os tipos de suprimento básicos
    #[arg(long)]
    skip_supply_types: bool,

    /// Cria um registro zerado de cada tipo em cada zona nova
    #[arg(long)]
    init_supplies: bool,

    /// URL da API de fronteiras
    #[arg(long, default_value = GEOAPIFY_BOUNDARIES_URL)]
    boundaries_url: String,
}

fn select_countries(codes: &[String]) -> Result<Vec<&'static Country>> {
    if codes.is_empty() {
        return Ok(COUNTRIES.iter().collect());
    }

    codes
        .iter()
        .map(|code| find_country(code).ok_or_else(|| anyhow!("País desconhecido: {code}")))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aidmap=info,seed=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let countries = select_countries(&cli.countries)?;

    let config = Config::from_env()?;
    let Some(api_key) = config.geoapify_api_key.clone() else {
        bail!("GEOAPIFY_API_KEY deve ser definida para o seed");
    };

    let pool = config.connect().await?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    let region_repo = RegionRepository::new(pool.clone());
    let supply_repo = SupplyRepository::new(pool.clone());
    // Ninguém escuta o hub aqui; ele só satisfaz o serviço
    let supply_service = SupplyService::new(
        supply_repo.clone(),
        region_repo.clone(),
        ZoneUpdateHub::new(),
        pool.clone(),
    );

    let seeder = Seeder::new(
        reqwest::Client::new(),
        cli.boundaries_url,
        api_key,
        region_repo,
        supply_repo,
        supply_service,
    );

    let report = seeder
        .run(
            &countries,
            SeedOptions {
                skip_supply_types: cli.skip_supply_types,
                init_supplies: cli.init_supplies,
            },
        )
        .await?;

    tracing::info!(
        supply_types = report.supply_types,
        regions = report.regions,
        zones = report.zones,
        "🌱 Seed concluído"
    );

    if !report.failed_countries.is_empty() {
        tracing::warn!(countries = ?report.failed_countries, "Alguns países falharam");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_country_selects_whole_catalog() {
        assert_eq!(select_countries(&[]).unwrap().len(), COUNTRIES.len());
    }

    #[test]
    fn unknown_country_is_an_error() {
        assert!(select_countries(&["PS".into(), "XX".into()]).is_err());
    }

    #[test]
    fn parses_repeated_country_flag() {
        let cli = Cli::parse_from(["seed", "--country", "PS", "--country", "sd", "--init-supplies"]);
        assert_eq!(cli.countries, vec!["PS", "sd"]);
        assert!(cli.init_supplies);
        assert!(!cli.skip_supply_types);
        assert_eq!(select_countries(&cli.countries).unwrap()[1].code, "SD");
    }
}
