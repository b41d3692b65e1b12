//! Share grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use audithub_core::error::{AppError, ErrorKind};
use audithub_core::result::AppResult;
use audithub_entity::share::{CreateShareGrant, ShareGrant};

use crate::store::ShareGrantStore;

/// Repository for share grant persistence and revocation.
#[derive(Debug, Clone)]
pub struct ShareGrantRepository {
    pool: PgPool,
}

impl ShareGrantRepository {
    /// Create a new share grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareGrantStore for ShareGrantRepository {
    async fn insert_grant(&self, grant: &CreateShareGrant) -> AppResult<ShareGrant> {
        sqlx::query_as::<_, ShareGrant>(
            "INSERT INTO session_shares \
             (id, session_id, created_by, can_read, can_comment, can_edit, expires_at, revoked) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE) RETURNING *",
        )
        .bind(grant.id)
        .bind(&grant.session_id)
        .bind(&grant.created_by)
        .bind(grant.permissions.read)
        .bind(grant.permissions.comment)
        .bind(grant.permissions.edit)
        .bind(grant.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create share grant", e))
    }

    async fn find_grant(&self, id: Uuid) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>("SELECT * FROM session_shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share grant", e)
            })
    }

    async fn mark_revoked(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE session_shares SET revoked = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to revoke share grant", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
