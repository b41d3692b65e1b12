//! Verified identity claims.

use serde::{Deserialize, Serialize};

/// Claims extracted from a verified identity bearer token.
///
/// The identity provider is an external collaborator; this is the only
/// slice of its token payload the subsystem consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject — the verified user id.
    pub sub: String,
    /// The user's email, when present in the token.
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl IdentityClaims {
    /// Returns the verified user id.
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}
