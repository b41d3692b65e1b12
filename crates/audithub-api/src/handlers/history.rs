//! Audit trail query handler.

use axum::Json;
use axum::extract::{Path, Query, State};

use audithub_core::types::pagination::Page;
use audithub_entity::audit::AuditEvent;
use audithub_service::audit::IngestAuth;

use crate::error::ApiError;
use crate::extractors::{MaybeAuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/sessions/{id}/history
pub async fn session_history(
    State(state): State<AppState>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Path(session_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<AuditEvent>>, ApiError> {
    let page = params.into_page_request(&state.config.audit);
    let auth = IngestAuth {
        identity,
        share_token: params.share_token,
    };

    let history = state
        .query_service
        .history(&auth, &session_id, page)
        .await?;
    Ok(Json(history))
}
