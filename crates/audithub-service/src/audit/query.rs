//! Paginated audit trail retrieval.

use std::sync::Arc;

use tracing::debug;

use audithub_core::config::audit::AuditConfig;
use audithub_core::error::AppError;
use audithub_core::types::pagination::{Page, PageRequest};
use audithub_database::store::{AuditLogStore, SessionDirectory};
use audithub_entity::audit::AuditEvent;

use crate::audit::ingest::IngestAuth;
use crate::ephemeral::{EphemeralEventStore, is_ephemeral_session};
use crate::share::{ShareTokenService, ShareValidation};

/// Serves paginated audit trails, authorized the same way as ingestion.
#[derive(Clone)]
pub struct AuditQueryService {
    sessions: Arc<dyn SessionDirectory>,
    audit_log: Arc<dyn AuditLogStore>,
    shares: Arc<ShareTokenService>,
    ephemeral: Arc<EphemeralEventStore>,
    config: AuditConfig,
}

impl AuditQueryService {
    /// Creates a new query service.
    pub fn new(
        sessions: Arc<dyn SessionDirectory>,
        audit_log: Arc<dyn AuditLogStore>,
        shares: Arc<ShareTokenService>,
        ephemeral: Arc<EphemeralEventStore>,
        config: AuditConfig,
    ) -> Self {
        Self {
            sessions,
            audit_log,
            shares,
            ephemeral,
            config,
        }
    }

    /// One page of a session's audit trail, ascending by ingestion
    /// timestamp.
    ///
    /// The limit is clamped to the configured maximum — clamped, never
    /// rejected. Authorization mirrors ingestion: session ownership via
    /// identity, or a read-equivalent share token for the same session.
    /// Test-session ids are served from the ephemeral store.
    pub async fn history(
        &self,
        auth: &IngestAuth,
        session_id: &str,
        page: PageRequest,
    ) -> Result<Page<AuditEvent>, AppError> {
        let page = page.bounded(self.config.default_page_size, self.config.max_page_size);

        if is_ephemeral_session(session_id) {
            debug!(session_id, "Serving history from ephemeral store");
            return Ok(self.ephemeral.history(session_id, &page));
        }

        self.authorize(auth, session_id).await?;

        let session = self.sessions.find_session(session_id).await?;
        if session.is_none() {
            return Err(AppError::not_found("Session not found"));
        }

        self.audit_log.session_history(session_id, &page).await
    }

    /// Same authorization rules as ingestion, minus principal resolution.
    async fn authorize(&self, auth: &IngestAuth, session_id: &str) -> Result<(), AppError> {
        if let Some(ctx) = &auth.identity {
            let owns = self
                .sessions
                .find_session(session_id)
                .await?
                .map(|s| s.is_owned_by(&ctx.user_id))
                .unwrap_or(false);
            if owns {
                return Ok(());
            }
        }

        if let Some(token) = &auth.share_token {
            if let ShareValidation::Valid { payload, .. } = self.shares.validate(token).await? {
                if payload.session_id == session_id && payload.permissions.allows_read() {
                    return Ok(());
                }
            }
        }

        if auth.identity.is_none() && auth.share_token.is_none() {
            Err(AppError::unauthorized("Authentication required"))
        } else {
            Err(AppError::forbidden(
                "Not authorized to read this session's history",
            ))
        }
    }
}

impl std::fmt::Debug for AuditQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditQueryService")
            .field("config", &self.config)
            .finish()
    }
}
