// Main entry point for the microblog API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{
    kernel::{PostgresStore, ServerDeps},
    server::build_app,
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting microblog API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        mention_marker = %config.markers.mention,
        tag_marker = %config.markers.tag,
        "Configuration loaded"
    );

    let deps = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database and running migrations...");
            let store =
                Arc::new(PostgresStore::connect(url, config.database_max_connections).await?);
            tracing::info!("Database ready");
            ServerDeps::new(store.clone(), store, config.markers)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            ServerDeps::in_memory(config.markers)
        }
    };

    let app = build_app(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
