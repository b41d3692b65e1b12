//! AuditHub Server — Access & Audit Control for collaborative sessions.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use audithub_api::state::AppState;
use audithub_auth::identity::verifier::JwtIdentityVerifier;
use audithub_auth::token::codec::ShareTokenCodec;
use audithub_cache::ValidationCaches;
use audithub_core::config::AppConfig;
use audithub_core::error::AppError;
use audithub_database::repositories::{
    AuditLogRepository, SessionRepository, ShareGrantRepository,
};
use audithub_database::store::{AuditLogStore, SessionDirectory, ShareGrantStore};
use audithub_service::audit::{AuditIngestionService, AuditQueryService};
use audithub_service::ephemeral::EphemeralEventStore;
use audithub_service::share::ShareTokenService;

#[tokio::main]
async fn main() {
    let env = std::env::var("AUDITHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing from the `[logging]` configuration.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => fmt().with_env_filter(filter).json().init(),
        _ => fmt().with_env_filter(filter).pretty().init(),
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AuditHub server...");

    // ── Durable store ────────────────────────────────────────────
    let db_pool = audithub_database::create_pool(&config.database).await?;
    let sessions: Arc<dyn SessionDirectory> = Arc::new(SessionRepository::new(db_pool.clone()));
    let grants: Arc<dyn ShareGrantStore> = Arc::new(ShareGrantRepository::new(db_pool.clone()));
    let audit_log: Arc<dyn AuditLogStore> = Arc::new(AuditLogRepository::new(db_pool.clone()));

    // ── Validation caches + sweeper ──────────────────────────────
    let caches = ValidationCaches::new(&config.cache);
    let _sweeper = caches.spawn_sweeper(Duration::from_secs(config.cache.sweep_interval_seconds));

    // ── Auth ─────────────────────────────────────────────────────
    let codec = Arc::new(ShareTokenCodec::new(&config.auth));
    let identity = Arc::new(JwtIdentityVerifier::new(&config.auth, caches.clone()));

    // ── Services ─────────────────────────────────────────────────
    let share_service = Arc::new(ShareTokenService::new(
        codec,
        Arc::clone(&sessions),
        Arc::clone(&grants),
        caches.clone(),
        &config.auth,
        config.server.public_base_url.clone(),
    ));
    let ephemeral = Arc::new(EphemeralEventStore::new());
    let ingestion_service = Arc::new(AuditIngestionService::new(
        Arc::clone(&sessions),
        Arc::clone(&audit_log),
        Arc::clone(&share_service),
        Arc::clone(&ephemeral),
    ));
    let query_service = Arc::new(AuditQueryService::new(
        sessions,
        audit_log,
        Arc::clone(&share_service),
        ephemeral,
        config.audit.clone(),
    ));

    // ── HTTP server ──────────────────────────────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        identity,
        share_service,
        ingestion_service,
        query_service,
    };

    let app = audithub_api::build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("AuditHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
