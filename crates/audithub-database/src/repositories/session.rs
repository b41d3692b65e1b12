//! Session repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use audithub_core::error::{AppError, ErrorKind};
use audithub_core::result::AppResult;
use audithub_entity::session::EditSession;

use crate::store::SessionDirectory;

/// Repository for editing session lookups.
///
/// Sessions are written by the external provider; this subsystem only
/// reads them to resolve ownership.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionDirectory for SessionRepository {
    async fn find_session(&self, id: &str) -> AppResult<Option<EditSession>> {
        sqlx::query_as::<_, EditSession>(
            "SELECT id, owner_id, title, created_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }
}
