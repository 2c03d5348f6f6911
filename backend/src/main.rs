//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use skymarket::inbound::http::health::HealthState;
use skymarket::outbound::persistence::{DbPool, run_migrations};

use server::{BuildMode, ServerConfig, ServerSettings, Store, create_server, key_fingerprint};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}

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
    let admin = settings.admin_bootstrap()?;
    let key = settings.session_key(BuildMode::from_debug_assertions())?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");

    let pool = match settings.pool_config() {
        Some(pool_config) => {
            let url = pool_config.database_url().to_owned();
            let applied = web::block(move || run_migrations(&url))
                .await
                .wrap_err("migration task panicked")??;
            info!(applied, "database migrations complete");
            Some(
                DbPool::new(pool_config)
                    .await
                    .wrap_err("failed to build database pool")?,
            )
        }
        None => None,
    };

    let store = Store::from_pool(pool);
    if let Some(admin) = admin {
        store
            .ensure_admin(&admin)
            .await
            .map_err(|err| eyre!("failed to ensure administrator: {}", err.message()))?;
    }

    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        settings.bind_addr(),
    );

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting server");
    create_server(health_state, config, &store, shutdown_signal())?.await?;
    Ok(())
}
