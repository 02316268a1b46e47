//! entitlement_server: subscription entitlement gate over HTTP.
//!
//! Configuration is read from the environment; see [`entitlement_server::config`].

use std::sync::Arc;

use anyhow::Context;
use entitlement_core::clock::SystemClock;
use entitlement_core::ports::SettingsStore;
use entitlement_core::service::EntitlementService;
use entitlement_postgres::PgStores;
use entitlement_server::config::ServerConfig;
use entitlement_server::middleware::jwt::JwtConfig;
use entitlement_server::router::build_router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,entitlement_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Connected to database");

    let stores = PgStores::new(pool);

    // Trial length is fixed for the life of the process.
    let stored_days = match stores.settings.load_trial_days().await {
        Ok(days) => days,
        Err(e) => {
            tracing::warn!(error = %e, "could not read trial_days from app_settings");
            None
        }
    };
    let policy = config.effective_policy(stored_days);
    tracing::info!(trial_days = policy.trial_days, "trial policy loaded");

    let service = Arc::new(EntitlementService::new(
        Arc::new(stores.subscriptions),
        Arc::new(SystemClock),
        policy,
    ));

    let jwt_config = JwtConfig::from_secret(config.jwt_secret.as_bytes());
    let app = build_router(service, jwt_config, config.redirects);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("entitlement_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
