//! Editing session entity model.
//!
//! Sessions are owned by the external identity/data provider; this
//! subsystem only reads them to resolve ownership. Identifiers are opaque
//! strings rather than UUIDs because reserved test-session identifiers
//! (`test-…`) are valid session ids on this surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A collaborative editing session as recorded in the durable store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    /// Opaque session identifier.
    pub id: String,
    /// Identifier of the user who owns the session.
    pub owner_id: String,
    /// Human-readable session title.
    pub title: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl EditSession {
    /// Whether the given principal owns this session.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}
