//! Runs the papertrail HTTP service.
//!
//! Usage:
//!
//! ```text
//! PAPERTRAIL_CONFIG=/etc/papertrail.toml papertrail
//! ```
//!
//! Settings come from the TOML file named by `PAPERTRAIL_CONFIG`, falling
//! back to `papertrail.toml` in the working directory and then to built-in
//! defaults. `PAPERTRAIL_*` environment variables override individual keys.
//! A representative file is:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [database]
//! url = "postgres://papertrail@localhost/papertrail"
//! pool_size = 10
//!
//! [locks]
//! backend = "postgres"
//! wait_timeout_ms = 5000
//!
//! [cache]
//! capacity = 1024
//!
//! [logging]
//! format = "json"
//! ```
//!
//! On start the service creates any missing tables, begins the daily
//! retention sweep, and serves until interrupted.

use std::sync::Arc;

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use papertrail::cache::{
    RecordCache,
    adapters::{DisabledCache, LruRecordCache},
};
use papertrail::config::{AppConfig, CacheConfig, ConfigError, LockBackend};
use papertrail::content::{
    adapters::postgres::PostgresMessageContentRepository,
    ports::MessageContentOperations,
    services::{LockingMessageContentService, MessageContentService, RetentionSweeper},
};
use papertrail::http::{self, AppState};
use papertrail::lock::{
    LockManager,
    adapters::{LocalLockManager, PostgresLockManager},
};
use papertrail::registration::{
    adapters::postgres::PostgresGuildRegistry,
    domain::RegistrationKind,
    services::{GuildRegistrationOperations, GuildRegistrationService},
};
use papertrail::telemetry;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::util::TryInitError;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-18-000000_create_papertrail_tables/up.sql");
const CONTENT_CACHE_REGION: &str = "messageContent";

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to install tracing subscriber: {0}")]
    Tracing(#[from] TryInitError),
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to create schema: {0}")]
    Schema(#[source] diesel::result::Error),
    #[error("schema task failed: {0}")]
    SchemaTask(#[source] tokio::task::JoinError),
    #[error("failed to bind {bind}: {source}")]
    Bind {
        bind: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    let pool = build_pool(&config.database.url, config.database.pool_size)?;
    bootstrap_schema(pool.clone()).await?;

    let content_cache = record_cache(&config.cache, CONTENT_CACHE_REGION);
    let content_service = Arc::new(MessageContentService::new(
        Arc::new(PostgresMessageContentRepository::new(pool.clone())),
        Arc::clone(&content_cache),
        Arc::new(DefaultClock),
    ));
    let content: Arc<dyn MessageContentOperations> = if config.locks.enabled {
        let settings = config.locks.settings();
        let locks: Arc<dyn LockManager> = match config.locks.backend {
            LockBackend::Postgres => {
                let lock_pool = build_pool(&config.database.url, config.locks.pool_size)?;
                Arc::new(PostgresLockManager::new(lock_pool, settings))
            }
            LockBackend::Local => Arc::new(LocalLockManager::new(settings)),
        };
        info!(backend = ?config.locks.backend, "per-message locking enabled");
        Arc::new(LockingMessageContentService::new(
            Arc::clone(&content_service),
            locks,
        ))
    } else {
        info!("per-message locking disabled");
        content_service
    };

    let state = AppState {
        audit_log: registrations(&pool, &config.cache, RegistrationKind::AuditLog),
        message_log: registrations(&pool, &config.cache, RegistrationKind::MessageLog),
        content,
    };

    let (stop_sweeper, sweeper_stopped) = oneshot::channel::<()>();
    let sweeper = RetentionSweeper::new(
        Arc::new(PostgresMessageContentRepository::new(pool)),
        content_cache,
        Arc::new(DefaultClock),
    );
    let sweeper_task = tokio::spawn(sweeper.run_until(async move {
        sweeper_stopped.await.unwrap_or(());
    }));

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .map_err(|source| StartupError::Bind {
            bind: config.server.bind.clone(),
            source,
        })?;
    info!(bind = %config.server.bind, "papertrail listening");

    let served = axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve);

    if stop_sweeper.send(()).is_err() {
        error!("retention sweeper exited early");
    }
    if let Err(err) = sweeper_task.await {
        error!(error = %err, "retention sweeper task failed");
    }
    info!("papertrail stopped");
    served
}

fn build_pool(url: &str, size: u32) -> Result<PgPool, PoolError> {
    Pool::builder()
        .max_size(size)
        .build(ConnectionManager::<PgConnection>::new(url))
}

async fn bootstrap_schema(pool: PgPool) -> Result<(), StartupError> {
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get()?;
        connection
            .batch_execute(SCHEMA_SQL)
            .map_err(StartupError::Schema)
    })
    .await
    .map_err(StartupError::SchemaTask)?
}

fn record_cache<V>(config: &CacheConfig, region: &'static str) -> Arc<dyn RecordCache<V>>
where
    V: Clone + Send + 'static,
{
    match config.region_capacity() {
        Some(capacity) => Arc::new(LruRecordCache::new(region, capacity)),
        None => Arc::new(DisabledCache::new(region)),
    }
}

fn registrations(
    pool: &PgPool,
    cache: &CacheConfig,
    kind: RegistrationKind,
) -> Arc<dyn GuildRegistrationOperations> {
    Arc::new(GuildRegistrationService::new(
        Arc::new(PostgresGuildRegistry::new(pool.clone(), kind)),
        record_cache(cache, kind.cache_region()),
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
