//! Request DTOs.

use serde::{Deserialize, Serialize};

use audithub_entity::share::SharePermissions;

/// POST /api/shares request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// Session to share.
    pub session_id: String,
    /// Permission set for the recipient.
    pub permissions: SharePermissions,
    /// Optional token lifetime in hours; the configured default applies
    /// when absent.
    #[serde(default)]
    pub expires_in_hours: Option<u64>,
}

/// GET /api/shares/validate query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateShareQuery {
    /// The share token to validate.
    pub token: String,
}

/// POST /api/events request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Session the action happened in.
    pub session_id: String,
    /// Action performed.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Structured, schema-free details payload.
    #[serde(default)]
    pub details: serde_json::Value,
    /// Optional client-supplied principal (test sessions and share-token
    /// submitters only).
    #[serde(default)]
    pub user_id: Option<String>,
    /// Share token presented instead of an identity credential.
    #[serde(default)]
    pub share_token: Option<String>,
}
