//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use audithub_entity::share::ShareRole;
use audithub_service::share::{ShareValidation, SharedPayload};

/// Response for a created share token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCreatedResponse {
    /// The signed share token.
    pub token: String,
    /// Share URL for the recipient.
    pub url: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// Response for a share token validation.
///
/// Invalid tokens carry only the generic message; the payload and role
/// are present exactly when `valid` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareValidationResponse {
    /// Whether the token is honored.
    pub valid: bool,
    /// The verified payload, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<SharedPayload>,
    /// Derived role, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ShareRole>,
    /// Generic failure message, when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ShareValidation> for ShareValidationResponse {
    fn from(validation: ShareValidation) -> Self {
        match validation {
            ShareValidation::Valid { payload, role } => Self {
                valid: true,
                payload: Some(payload),
                role: Some(role),
                message: None,
            },
            ShareValidation::Invalid { message } => Self {
                valid: false,
                payload: None,
                role: None,
                message: Some(message),
            },
        }
    }
}

/// Response for an ingested audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Event id assigned at ingestion.
    pub id: Uuid,
    /// Session identifier.
    pub session_id: String,
    /// Resolved principal.
    pub user_id: String,
    /// Action performed.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Server-assigned timestamp.
    pub timestamp: DateTime<Utc>,
    /// Whether the recorded action succeeded.
    pub success: bool,
}

impl From<audithub_entity::audit::AuditEvent> for EventResponse {
    fn from(event: audithub_entity::audit::AuditEvent) -> Self {
        Self {
            id: event.id,
            session_id: event.session_id,
            user_id: event.user_id,
            event_type: event.event_type,
            timestamp: event.timestamp,
            success: event.success,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
