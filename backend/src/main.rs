//! Backend entry-point: loads settings, wires storage, and starts the server.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::{AppSettings, SeedSettings};
use backend::domain::ports::{LoginService, PasswordHasher, Storage};
use backend::domain::{AccountLoginService, SeedOutcome, seed_if_empty};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::inbound::http::state::HttpStatePorts;
use backend::outbound::memory::MemoryStore;
use backend::outbound::password::Argon2PasswordHasher;
use backend::outbound::persistence::{DbPool, PoolConfig, diesel_storage, run_pending_migrations};
use backend::server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().wrap_err("failed to load application settings")?;
    let seed = SeedSettings::load().wrap_err("failed to load seed settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;

    let storage = build_storage(&settings).await?;
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::default());

    if let Some(password) = seed.password()? {
        match seed_if_empty(&storage, hasher.clone(), password).await? {
            SeedOutcome::Seeded { .. } => info!("fixture data seeded"),
            SeedOutcome::Skipped => {}
        }
    }

    let login: Arc<dyn LoginService> = Arc::new(
        AccountLoginService::new(storage.users.clone(), hasher.clone())
            .wrap_err("failed to prepare login service")?,
    );
    let ports = HttpStatePorts {
        storage,
        hasher,
        login,
    };

    let config = ServerConfig::new(ports, session, settings.bind_addr()?)
        .with_origins(settings.origin_policy());
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(backend::server::metrics::prometheus());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}

/// PostgreSQL when a database URL is configured, otherwise the in-memory store.
async fn build_storage(settings: &AppSettings) -> Result<Storage> {
    let Some(url) = settings.database_url() else {
        warn!("no database configured; data will not survive a restart");
        return Ok(Storage::from_shared(Arc::new(MemoryStore::default())));
    };

    run_pending_migrations(url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .wrap_err("failed to create database pool")?;
    Ok(diesel_storage(pool))
}
