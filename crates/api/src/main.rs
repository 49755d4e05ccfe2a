use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use apple_issuer_api::{
    app::{create_app, AppState},
    config::Config,
    middleware,
};
use persistence::PgIssuerStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics().context("Failed to install Prometheus recorder")?;

    info!("Starting Apple issuer API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&(&config.database).into()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let addr = config.socket_addr().context("Invalid server address")?;
    let store = Arc::new(PgIssuerStore::new(pool.clone()));
    let state = AppState::new(config, pool, store)?;
    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
