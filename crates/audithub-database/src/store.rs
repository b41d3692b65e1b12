//! Store traits for the three durable record types.
//!
//! The subsystem reads `sessions` (ownership), reads/writes
//! `session_shares` (revocation records), and appends to `audit_logs`.
//! Nothing here exposes update or delete on audit events — the trail is
//! append-only by construction.

use async_trait::async_trait;

use audithub_core::result::AppResult;
use audithub_core::types::pagination::{Page, PageRequest};
use audithub_entity::audit::{AuditEvent, CreateAuditEvent};
use audithub_entity::session::EditSession;
use audithub_entity::share::{CreateShareGrant, ShareGrant};
use uuid::Uuid;

/// Read-only lookup of editing sessions for ownership checks.
#[async_trait]
pub trait SessionDirectory: Send + Sync + 'static {
    /// Find a session by its identifier.
    async fn find_session(&self, id: &str) -> AppResult<Option<EditSession>>;
}

/// Persistence of share grants (the revocation records behind tokens).
#[async_trait]
pub trait ShareGrantStore: Send + Sync + 'static {
    /// Persist a new grant.
    async fn insert_grant(&self, grant: &CreateShareGrant) -> AppResult<ShareGrant>;

    /// Find a grant by token id.
    async fn find_grant(&self, id: Uuid) -> AppResult<Option<ShareGrant>>;

    /// Mark a grant revoked. Returns `false` if no such grant exists.
    async fn mark_revoked(&self, id: Uuid) -> AppResult<bool>;
}

/// Append-only persistence of audit events.
#[async_trait]
pub trait AuditLogStore: Send + Sync + 'static {
    /// Append an event and return the persisted record.
    async fn insert_event(&self, event: &CreateAuditEvent) -> AppResult<AuditEvent>;

    /// One page of a session's trail, ascending by ingestion timestamp,
    /// together with the total count.
    async fn session_history(
        &self,
        session_id: &str,
        page: &PageRequest,
    ) -> AppResult<Page<AuditEvent>>;
}
