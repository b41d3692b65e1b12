//! Share token claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use audithub_entity::share::{SharePermissions, ShareRole};

/// Claims payload embedded in every signed share token.
///
/// The payload is immutable after issuance; revocation is recorded
/// against the `jti` in the durable store, never by rewriting the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareClaims {
    /// Session ID this token grants access to.
    pub sid: String,
    /// Permission set carried by the token.
    pub perms: SharePermissions,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID, used for revocation tracking.
    pub jti: Uuid,
}

impl ShareClaims {
    /// Builds claims for a new token.
    pub fn new(
        session_id: impl Into<String>,
        perms: SharePermissions,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sid: session_id.into(),
            perms,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Returns the issued-at time as a `DateTime<Utc>`.
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_else(Utc::now)
    }

    /// Derives the coarse role for this token's permission set.
    pub fn role(&self) -> ShareRole {
        ShareRole::from_permissions(&self.perms)
    }
}
