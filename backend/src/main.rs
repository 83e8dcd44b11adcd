//! Discount code service entry point.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ticketing_backend::inbound::http::auth::TokenVerifier;
use ticketing_backend::inbound::http::health::HealthState;
use ticketing_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ticketing_backend::settings::ServerSettings;

use server::{ServerConfig, create_server};

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
        ServerSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let database_url = settings.database_url()?;
    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("database migrations failed")?;
    }
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build the connection pool")?;
    let secret = settings.jwt_secret()?;
    let bind_addr = settings.bind_addr()?;

    let config = ServerConfig::new(bind_addr, pool, TokenVerifier::hs256(&secret));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "discount code service listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated with an error")
}

