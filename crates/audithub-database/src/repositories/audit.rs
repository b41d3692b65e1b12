//! Audit log repository implementation.
//!
//! Insert and read only — the `audit_logs` table has no update or delete
//! path through this subsystem.

use async_trait::async_trait;
use sqlx::PgPool;

use audithub_core::error::{AppError, ErrorKind};
use audithub_core::result::AppResult;
use audithub_core::types::pagination::{Page, PageRequest};
use audithub_entity::audit::{AuditEvent, CreateAuditEvent};
use uuid::Uuid;

use crate::store::AuditLogStore;

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn insert_event(&self, event: &CreateAuditEvent) -> AppResult<AuditEvent> {
        sqlx::query_as::<_, AuditEvent>(
            "INSERT INTO audit_logs (id, session_id, user_id, event_type, details, timestamp, success) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&event.session_id)
        .bind(&event.user_id)
        .bind(&event.event_type)
        .bind(&event.details)
        .bind(event.timestamp)
        .bind(event.success)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit event", e))
    }

    async fn session_history(
        &self,
        session_id: &str,
        page: &PageRequest,
    ) -> AppResult<Page<AuditEvent>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE session_id = $1")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count audit events", e)
            })?;

        let items = sqlx::query_as::<_, AuditEvent>(
            "SELECT * FROM audit_logs WHERE session_id = $1 \
             ORDER BY timestamp ASC LIMIT $2 OFFSET $3",
        )
        .bind(session_id)
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit events", e))?;

        Ok(Page::new(total as u64, items))
    }
}
