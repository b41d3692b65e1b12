//! Event delivery sinks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use audithub_core::error::AppError;

/// A client-side audit event awaiting submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Session the action happened in.
    pub session_id: String,
    /// Action performed.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Structured details payload.
    #[serde(default)]
    pub details: serde_json::Value,
    /// Optional client-supplied principal.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Share token presented instead of an identity credential.
    #[serde(default)]
    pub share_token: Option<String>,
}

/// Confirmation returned by the service for an ingested event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReceipt {
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

/// Destination for drained audit events.
///
/// The queue is generic over the sink so tests can substitute an
/// in-memory endpoint for the HTTP service.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Submit one event. A returned receipt is a confirmed ingestion; any
    /// error leaves the caller free to retry per its policy.
    async fn submit(&self, draft: &EventDraft) -> Result<EventReceipt, AppError>;
}

/// HTTP sink posting events to the ingestion endpoint.
#[derive(Debug, Clone)]
pub struct HttpEventSink {
    client: reqwest::Client,
    events_url: String,
    bearer_token: Option<String>,
}

impl HttpEventSink {
    /// Create a sink for the given service base URL (e.g.
    /// `http://localhost:4006`).
    pub fn new(base_url: &str, bearer_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            events_url: format!("{}/api/events", base_url.trim_end_matches('/')),
            bearer_token,
        }
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn submit(&self, draft: &EventDraft) -> Result<EventReceipt, AppError> {
        let mut request = self.client.post(&self.events_url).json(draft);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("Event submission failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<EventReceipt>()
                .await
                .map_err(|e| AppError::internal(format!("Malformed ingestion response: {e}")));
        }

        let message = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 => AppError::unauthorized(message),
            403 => AppError::forbidden(message),
            400 => AppError::validation(message),
            404 => AppError::not_found(message),
            _ => AppError::service_unavailable(format!("Ingestion returned {status}: {message}")),
        })
    }
}
