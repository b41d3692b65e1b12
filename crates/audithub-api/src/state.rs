//! Application state shared across all handlers.

use std::sync::Arc;

use audithub_auth::identity::verifier::IdentityVerifier;
use audithub_core::config::AppConfig;
use audithub_service::audit::{AuditIngestionService, AuditQueryService};
use audithub_service::share::ShareTokenService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Identity bearer-token verifier.
    pub identity: Arc<dyn IdentityVerifier>,
    /// Share token service.
    pub share_service: Arc<ShareTokenService>,
    /// Audit ingestion service.
    pub ingestion_service: Arc<AuditIngestionService>,
    /// Audit query service.
    pub query_service: Arc<AuditQueryService>,
}
