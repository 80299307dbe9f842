//! Backend entry-point: loads settings, prepares storage and runs the server.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use learnhub::inbound::http::health::HealthState;
use learnhub::inbound::http::session_config::{BuildMode, session_settings_from_env};
use learnhub::inbound::ws::state::AllowedOrigins;
use learnhub::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use learnhub::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let session = session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::current())
        .map_err(io::Error::other)?;
    let allowed_origins = AllowedOrigins::parse(settings.allowed_origins()).map_err(
        |(entry, e)| io::Error::other(format!("invalid allowed origin {entry:?}: {e}")),
    )?;

    let mut config = ServerConfig::new(session, bind_addr)
        .with_allowed_origins(allowed_origins)
        .with_seed_courses(settings.seed_courses())
        .with_catalog_latency(settings.catalog_latency());

    if let Some(database_url) = settings.database_url() {
        let applied = run_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
        info!(applied, "database ready");
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| io::Error::other(e.into_message()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await
}
