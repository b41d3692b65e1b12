//! Audit event ingestion.
//!
//! Ingestion is at-least-once from the caller's perspective: a caller
//! that does not receive a confirmed response retries the same logical
//! event, and the service does not deduplicate retries. Duplicate records
//! are an accepted trade-off; see DESIGN.md.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use audithub_core::error::AppError;
use audithub_database::store::{AuditLogStore, SessionDirectory};
use audithub_entity::audit::{AuditEvent, CreateAuditEvent};

use crate::context::RequestContext;
use crate::ephemeral::{EphemeralEventStore, is_ephemeral_session};
use crate::share::{ShareTokenService, ShareValidation};

/// A client-submitted audit event before ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Session the action happened in.
    pub session_id: String,
    /// Action performed (open vocabulary).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Structured, schema-free details payload.
    #[serde(default)]
    pub details: serde_json::Value,
    /// Optional client-supplied principal, honored only where no verified
    /// identity is available (test sessions, share-token submitters).
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Authorization material accompanying an ingestion request.
#[derive(Debug, Clone, Default)]
pub struct IngestAuth {
    /// Verified identity, when the caller presented a bearer credential.
    pub identity: Option<RequestContext>,
    /// Raw share token, when the caller presented one.
    pub share_token: Option<String>,
}

/// Accepts audit events, resolves authorization, and persists them.
#[derive(Clone)]
pub struct AuditIngestionService {
    sessions: Arc<dyn SessionDirectory>,
    audit_log: Arc<dyn AuditLogStore>,
    shares: Arc<ShareTokenService>,
    ephemeral: Arc<EphemeralEventStore>,
}

impl AuditIngestionService {
    /// Creates a new ingestion service.
    pub fn new(
        sessions: Arc<dyn SessionDirectory>,
        audit_log: Arc<dyn AuditLogStore>,
        shares: Arc<ShareTokenService>,
        ephemeral: Arc<EphemeralEventStore>,
    ) -> Self {
        Self {
            sessions,
            audit_log,
            shares,
            ephemeral,
        }
    }

    /// Ingests one audit event.
    ///
    /// Test-session identifiers bypass authorization and the durable
    /// store entirely; everything else requires a verified identity that
    /// owns the session, or a valid share token for it.
    pub async fn ingest(
        &self,
        auth: &IngestAuth,
        draft: EventDraft,
    ) -> Result<AuditEvent, AppError> {
        if draft.event_type.is_empty() {
            return Err(AppError::validation("Event type is required"));
        }
        if draft.session_id.is_empty() {
            return Err(AppError::validation("Session id is required"));
        }

        if is_ephemeral_session(&draft.session_id) {
            return Ok(self.ingest_ephemeral(auth, draft));
        }

        let user_id = self.authorize(auth, &draft).await?;

        let event = self
            .audit_log
            .insert_event(&CreateAuditEvent {
                session_id: draft.session_id,
                user_id,
                event_type: draft.event_type,
                details: draft.details,
                timestamp: Utc::now(),
                success: true,
            })
            .await?;

        info!(
            event_id = %event.id,
            session_id = %event.session_id,
            user_id = %event.user_id,
            event_type = %event.event_type,
            "Audit event ingested"
        );

        Ok(event)
    }

    /// The test-session path: no authorization, no durable writes.
    fn ingest_ephemeral(&self, auth: &IngestAuth, draft: EventDraft) -> AuditEvent {
        let user_id = draft
            .user_id
            .or_else(|| auth.identity.as_ref().map(|ctx| ctx.user_id.clone()))
            .unwrap_or_else(|| format!("test-user-{}", Uuid::new_v4()));

        let event =
            self.ephemeral
                .append(&draft.session_id, user_id, draft.event_type, draft.details);

        debug!(
            event_id = %event.id,
            session_id = %event.session_id,
            "Test event stored in ephemeral store"
        );

        event
    }

    /// Resolves the acting principal for a non-test session.
    ///
    /// Order: session ownership via verified identity, then a valid share
    /// token scoped to the same session. No credentials at all is
    /// `Unauthorized`; credentials without sufficient rights is
    /// `Forbidden`.
    async fn authorize(&self, auth: &IngestAuth, draft: &EventDraft) -> Result<String, AppError> {
        if let Some(ctx) = &auth.identity {
            let owns = self
                .sessions
                .find_session(&draft.session_id)
                .await?
                .map(|s| s.is_owned_by(&ctx.user_id))
                .unwrap_or(false);
            if owns {
                return Ok(ctx.user_id.clone());
            }
        }

        if let Some(token) = &auth.share_token {
            if let ShareValidation::Valid { payload, .. } = self.shares.validate(token).await? {
                if payload.session_id == draft.session_id && payload.permissions.allows_read() {
                    let principal = draft
                        .user_id
                        .clone()
                        .or_else(|| auth.identity.as_ref().map(|ctx| ctx.user_id.clone()))
                        .unwrap_or_else(|| format!("share-{}", payload.token_id));
                    return Ok(principal);
                }
            }
        }

        if auth.identity.is_none() && auth.share_token.is_none() {
            Err(AppError::unauthorized("Authentication required"))
        } else {
            Err(AppError::forbidden(
                "Not authorized to record events for this session",
            ))
        }
    }
}

impl std::fmt::Debug for AuditIngestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditIngestionService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::ShareTokenService;
    use crate::testing::{
        MemoryAuditStore, MemoryGrantStore, MemorySessionDirectory, auth_config, caches,
        request_context,
    };
    use audithub_auth::token::codec::ShareTokenCodec;
    use audithub_core::error::ErrorKind;
    use audithub_entity::share::SharePermissions;

    struct Fixture {
        service: AuditIngestionService,
        sessions: Arc<MemorySessionDirectory>,
        audit_log: Arc<MemoryAuditStore>,
        shares: Arc<ShareTokenService>,
        ephemeral: Arc<EphemeralEventStore>,
    }

    fn fixture() -> Fixture {
        let config = auth_config();
        let sessions = Arc::new(MemorySessionDirectory::with_session("s1", "owner-1"));
        let grants = Arc::new(MemoryGrantStore::new());
        let audit_log = Arc::new(MemoryAuditStore::new());
        let ephemeral = Arc::new(EphemeralEventStore::new());
        let shares = Arc::new(ShareTokenService::new(
            Arc::new(ShareTokenCodec::new(&config)),
            Arc::clone(&sessions) as Arc<dyn audithub_database::store::SessionDirectory>,
            grants,
            caches(),
            &config,
            "http://localhost:3000",
        ));
        let service = AuditIngestionService::new(
            Arc::clone(&sessions) as Arc<dyn audithub_database::store::SessionDirectory>,
            Arc::clone(&audit_log) as Arc<dyn AuditLogStore>,
            Arc::clone(&shares),
            Arc::clone(&ephemeral),
        );
        Fixture {
            service,
            sessions,
            audit_log,
            shares,
            ephemeral,
        }
    }

    fn draft(session_id: &str) -> EventDraft {
        EventDraft {
            session_id: session_id.to_string(),
            event_type: "edit".to_string(),
            details: serde_json::json!({"slide": 1}),
            user_id: None,
        }
    }

    fn identity_auth(user_id: &str) -> IngestAuth {
        IngestAuth {
            identity: Some(request_context(user_id)),
            share_token: None,
        }
    }

    #[tokio::test]
    async fn test_owner_ingestion_persists() {
        let fx = fixture();
        let event = fx
            .service
            .ingest(&identity_auth("owner-1"), draft("s1"))
            .await
            .unwrap();
        assert_eq!(event.session_id, "s1");
        assert_eq!(event.user_id, "owner-1");
        assert!(event.success);
        assert_eq!(fx.audit_log.event_count(), 1);
    }

    #[tokio::test]
    async fn test_no_credentials_is_unauthorized() {
        let fx = fixture();
        let err = fx
            .service
            .ingest(&IngestAuth::default(), draft("s1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(fx.audit_log.event_count(), 0);
    }

    #[tokio::test]
    async fn test_non_owner_without_token_is_forbidden() {
        let fx = fixture();
        let err = fx
            .service
            .ingest(&identity_auth("someone-else"), draft("s1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_share_token_authorizes_and_mints_synthetic_principal() {
        let fx = fixture();
        let share = fx
            .shares
            .create(
                &request_context("owner-1"),
                "s1",
                SharePermissions::read_only(),
                None,
            )
            .await
            .unwrap();

        let auth = IngestAuth {
            identity: None,
            share_token: Some(share.token),
        };
        let event = fx.service.ingest(&auth, draft("s1")).await.unwrap();
        assert!(event.user_id.starts_with("share-"));
        assert_eq!(fx.audit_log.event_count(), 1);
    }

    #[tokio::test]
    async fn test_share_token_for_other_session_is_forbidden() {
        let fx = fixture();
        fx.sessions.add_session("s2", "owner-1");
        let share = fx
            .shares
            .create(
                &request_context("owner-1"),
                "s2",
                SharePermissions::read_only(),
                None,
            )
            .await
            .unwrap();

        let auth = IngestAuth {
            identity: None,
            share_token: Some(share.token),
        };
        let err = fx.service.ingest(&auth, draft("s1")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_ephemeral_session_skips_auth_and_durable_store() {
        let fx = fixture();
        let event = fx
            .service
            .ingest(&IngestAuth::default(), draft("test-s1"))
            .await
            .unwrap();

        assert!(event.user_id.starts_with("test-user-"));
        // Never present in the durable store.
        assert_eq!(fx.audit_log.event_count(), 0);
        // Immediately retrievable from the ephemeral store.
        let page = fx.ephemeral.history(
            "test-s1",
            &audithub_core::types::pagination::PageRequest { limit: 10, offset: 0 },
        );
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_ephemeral_session_honors_supplied_user_id() {
        let fx = fixture();
        let mut d = draft("test-s1");
        d.user_id = Some("tester-7".to_string());
        let event = fx
            .service
            .ingest(&IngestAuth::default(), d)
            .await
            .unwrap();
        assert_eq!(event.user_id, "tester-7");
    }

    #[tokio::test]
    async fn test_retried_event_is_stored_twice() {
        // At-least-once: the service does not deduplicate retries.
        let fx = fixture();
        let auth = identity_auth("owner-1");
        fx.service.ingest(&auth, draft("s1")).await.unwrap();
        fx.service.ingest(&auth, draft("s1")).await.unwrap();
        assert_eq!(fx.audit_log.event_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_event_type_is_rejected() {
        let fx = fixture();
        let mut d = draft("s1");
        d.event_type.clear();
        let err = fx
            .service
            .ingest(&identity_auth("owner-1"), d)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
