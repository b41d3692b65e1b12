//! Share token handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Duration;
use uuid::Uuid;

use crate::dto::request::{CreateShareRequest, ValidateShareQuery};
use crate::dto::response::{ShareCreatedResponse, ShareValidationResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<ShareCreatedResponse>), ApiError> {
    let expires_in = req.expires_in_hours.map(|h| Duration::hours(h as i64));

    let share = state
        .share_service
        .create(&auth, &req.session_id, req.permissions, expires_in)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShareCreatedResponse {
            token: share.token,
            url: share.url,
            expires_at: share.expires_at,
        }),
    ))
}

/// GET /api/shares/validate?token=
///
/// Always answers 200; an unusable token is reported through the body's
/// `valid` flag and generic message, never through the status code.
pub async fn validate_share(
    State(state): State<AppState>,
    Query(query): Query<ValidateShareQuery>,
) -> Result<Json<ShareValidationResponse>, ApiError> {
    let validation = state.share_service.validate(&query.token).await?;
    Ok(Json(ShareValidationResponse::from(validation)))
}

/// DELETE /api/shares/{token_id}
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.share_service.revoke(&auth, token_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
