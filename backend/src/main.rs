//! Backend entry-point: loads settings, wires the stores and serves the API.

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use anime_backend::inbound::http::health::HealthState;
use anime_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use anime_backend::server::{ServerConfig, build_ports, create_server, seed_demo_accounts};
use anime_backend::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr);

    if let Some(database_url) = settings.database_url.as_deref() {
        if settings.run_migrations() {
            let applied = run_pending_migrations(database_url)
                .await
                .wrap_err("failed to apply database migrations")?;
            info!(applied, "database schema is current");
        }
        let pool_config =
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()?);
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    if settings.metrics_enabled() {
        config = config.with_metrics(Some(anime_backend::server::make_metrics()?));
    }

    let ports = build_ports(&config);
    if settings.seed_demo_accounts() {
        seed_demo_accounts(
            ports.accounts.as_ref(),
            settings.demo_password(),
            settings.password_cost(),
        )
            .await
            .wrap_err("failed to seed demo accounts")?;
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config, ports)?;
    info!(%bind_addr, "listening");
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
