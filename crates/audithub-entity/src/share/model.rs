//! Share grant entity model.
//!
//! A grant is the durable, revocation-capable record behind a signed share
//! token. The token payload itself is never mutated after issuance;
//! revocation lives here, as store state keyed by the token id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::permissions::SharePermissions;

/// A revocation-capable record of an issued share token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShareGrant {
    /// The token id (`jti`) embedded in the signed token.
    pub id: Uuid,
    /// The session the token grants access to.
    pub session_id: String,
    /// The user who issued the token.
    pub created_by: String,
    /// Read permission flag.
    pub can_read: bool,
    /// Comment permission flag.
    pub can_comment: bool,
    /// Edit permission flag.
    pub can_edit: bool,
    /// Absolute expiry of the token.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been explicitly revoked.
    pub revoked: bool,
    /// When the grant was issued.
    pub created_at: DateTime<Utc>,
}

impl ShareGrant {
    /// The grant's permission set.
    pub fn permissions(&self) -> SharePermissions {
        SharePermissions {
            read: self.can_read,
            comment: self.can_comment,
            edit: self.can_edit,
        }
    }

    /// Whether the grant is still honored: not revoked and not expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// Data required to persist a new share grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareGrant {
    /// Token id, generated at issuance.
    pub id: Uuid,
    /// Session being shared.
    pub session_id: String,
    /// Issuing user.
    pub created_by: String,
    /// Permission set carried by the token.
    pub permissions: SharePermissions,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}
