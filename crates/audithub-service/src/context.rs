//! Request context carrying the verified identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use audithub_auth::identity::claims::IdentityClaims;

/// Context for the current identity-authenticated request.
///
/// Built by the HTTP extractor from verified identity claims and passed
/// into service methods so every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The verified user's id.
    pub user_id: String,
    /// The user's email, when the identity token carried one.
    pub email: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email,
            request_time: Utc::now(),
        }
    }
}

impl From<IdentityClaims> for RequestContext {
    fn from(claims: IdentityClaims) -> Self {
        Self::new(claims.sub, claims.email)
    }
}
