//! Identity extractors — pull the bearer credential from the
//! Authorization header and verify it into a request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use audithub_core::error::AppError;
use audithub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted verified identity, required.
///
/// Rejects the request with `Unauthorized` when the header is missing or
/// the credential does not verify.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extracted verified identity, optional.
///
/// Yields `None` when no Authorization header is present — the events and
/// history endpoints accept a share token instead. A header that is
/// present but fails verification still rejects the request: a bad
/// credential is never silently downgraded to anonymous.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;
    Ok(Some(token))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;
        let claims = state.identity.verify_bearer(token).await?;
        Ok(AuthUser(RequestContext::from(claims)))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => {
                let claims = state.identity.verify_bearer(token).await?;
                Ok(MaybeAuthUser(Some(RequestContext::from(claims))))
            }
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
