//! Audit event entity model.
//!
//! Events are append-only: once ingested they are never mutated or
//! deleted by this subsystem. No update or delete path exists on purpose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit event recording one user action in a session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Unique event identifier, generated at ingestion.
    pub id: Uuid,
    /// The session the action happened in.
    pub session_id: String,
    /// The resolved principal: a verified user id, or a synthetic id for
    /// test sessions and share-token submitters.
    pub user_id: String,
    /// The action performed (open vocabulary, e.g. `"edit"`, `"comment"`,
    /// `"merge"`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Structured, schema-free payload supplied by the client.
    pub details: serde_json::Value,
    /// Server-assigned timestamp, monotonic within a session's ingestion
    /// order.
    pub timestamp: DateTime<Utc>,
    /// Whether the recorded action succeeded.
    pub success: bool,
}

/// Data required to persist a new audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditEvent {
    /// Session identifier.
    pub session_id: String,
    /// Resolved principal.
    pub user_id: String,
    /// Action performed.
    pub event_type: String,
    /// Structured details payload.
    pub details: serde_json::Value,
    /// Server-assigned timestamp.
    pub timestamp: DateTime<Utc>,
    /// Whether the action succeeded.
    pub success: bool,
}
