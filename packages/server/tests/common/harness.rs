//! Test harness for integration testing.
//!
//! Most tests run against a fresh in-memory store. The Postgres harness
//! shares one container across the whole run: it is started and migrated
//! on first use, then every test connects its own pool to it.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use server_core::domains::annotation::Markers;
use server_core::domains::publishers::actions::register_publisher;
use server_core::domains::publishers::models::Publisher;
use server_core::kernel::{PostgresStore, ServerDeps};
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Route `tracing` output through the test writer.
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh in-memory dependencies with the default `@` / `#` markers.
pub fn memory_deps() -> ServerDeps {
    init_tracing();
    ServerDeps::in_memory(Markers::default())
}

/// Midnight UTC on the given day of March 2024.
pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
}

pub async fn register(deps: &ServerDeps, handle: &str) -> Publisher {
    register_publisher(handle, day(1), deps)
        .await
        .expect("registration should succeed")
}

// =============================================================================
// Shared Postgres container
// =============================================================================

struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Dependencies backed by the shared Postgres container.
///
/// The database is shared between tests, so callers should use unique
/// handles and tag names (see [`unique`]).
pub async fn postgres_deps() -> ServerDeps {
    let infra = SharedTestInfra::get().await;
    let pool = PgPool::connect(&infra.db_url)
        .await
        .expect("Failed to connect to shared Postgres");
    let store = Arc::new(PostgresStore::new(pool));
    ServerDeps::new(store.clone(), store, Markers::default())
}

/// `prefix` plus a random suffix, for names that must not collide across tests.
pub fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}
