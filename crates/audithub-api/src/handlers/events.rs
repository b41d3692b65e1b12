//! Audit event ingestion handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use audithub_service::audit::{EventDraft, IngestAuth};

use crate::dto::request::CreateEventRequest;
use crate::dto::response::EventResponse;
use crate::error::ApiError;
use crate::extractors::MaybeAuthUser;
use crate::state::AppState;

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let auth = IngestAuth {
        identity,
        share_token: req.share_token,
    };

    let draft = EventDraft {
        session_id: req.session_id,
        event_type: req.event_type,
        details: req.details,
        user_id: req.user_id,
    };

    let event = state.ingestion_service.ingest(&auth, draft).await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}
