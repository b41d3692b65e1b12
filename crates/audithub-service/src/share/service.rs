//! Share token lifecycle: create, validate, revoke.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use audithub_auth::token::claims::ShareClaims;
use audithub_auth::token::codec::ShareTokenCodec;
use audithub_cache::{ValidationCaches, keys};
use audithub_core::config::auth::AuthConfig;
use audithub_core::error::AppError;
use audithub_database::store::{SessionDirectory, ShareGrantStore};
use audithub_entity::share::{CreateShareGrant, SharePermissions, ShareRole};

use crate::context::RequestContext;

/// The one message returned for every invalid share link.
///
/// Deliberately generic and non-enumerable: callers must not be able to
/// distinguish malformed from expired from revoked from nonexistent, or
/// learn whether the underlying session exists.
const GENERIC_INVALID_MESSAGE: &str = "invalid or expired share link";

/// Manages share token issuance, validation, and revocation.
#[derive(Clone)]
pub struct ShareTokenService {
    codec: Arc<ShareTokenCodec>,
    sessions: Arc<dyn SessionDirectory>,
    grants: Arc<dyn ShareGrantStore>,
    caches: ValidationCaches,
    default_ttl_hours: u64,
    public_base_url: String,
}

/// Result of a successful share token creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedShare {
    /// The signed token.
    pub token: String,
    /// The share URL to hand to the recipient.
    pub url: String,
    /// Absolute expiry of the token.
    pub expires_at: DateTime<Utc>,
}

/// The payload exposed for a validated token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPayload {
    /// The session the token grants access to.
    pub session_id: String,
    /// The permission set carried by the token.
    pub permissions: SharePermissions,
    /// Token id.
    pub token_id: Uuid,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl From<&ShareClaims> for SharedPayload {
    fn from(claims: &ShareClaims) -> Self {
        Self {
            session_id: claims.sid.clone(),
            permissions: claims.perms,
            token_id: claims.jti,
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }
}

/// Outcome of validating a share token.
#[derive(Debug, Clone)]
pub enum ShareValidation {
    /// The token is good: here is its payload and the derived role.
    Valid {
        /// The verified token payload.
        payload: SharedPayload,
        /// Coarse role derived from the payload's permissions.
        role: ShareRole,
    },
    /// The token is not honored. The message never says why.
    Invalid {
        /// Generic, non-enumerable message.
        message: String,
    },
}

impl ShareValidation {
    fn invalid() -> Self {
        Self::Invalid {
            message: GENERIC_INVALID_MESSAGE.to_string(),
        }
    }

    /// Whether the validation succeeded.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

impl ShareTokenService {
    /// Creates a new share token service.
    pub fn new(
        codec: Arc<ShareTokenCodec>,
        sessions: Arc<dyn SessionDirectory>,
        grants: Arc<dyn ShareGrantStore>,
        caches: ValidationCaches,
        auth_config: &AuthConfig,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            sessions,
            grants,
            caches,
            default_ttl_hours: auth_config.share_token_ttl_hours,
            public_base_url: public_base_url.into(),
        }
    }

    /// Issues a new share token for a session the requester owns.
    ///
    /// Persists the revocation-capable grant record, then returns the
    /// signed token plus a constructed share URL. Fails with `Validation`
    /// for an empty permission set and `Forbidden` when the requester does
    /// not own the session.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        session_id: &str,
        permissions: SharePermissions,
        expires_in: Option<Duration>,
    ) -> Result<CreatedShare, AppError> {
        if permissions.is_empty() {
            return Err(AppError::validation(
                "Share requires at least one permission",
            ));
        }

        let session = self
            .sessions
            .find_session(session_id)
            .await?
            .filter(|s| s.is_owned_by(&ctx.user_id))
            .ok_or_else(|| AppError::forbidden("Only the session owner can share it"))?;

        let now = Utc::now();
        let expires_at = now + expires_in.unwrap_or(Duration::hours(self.default_ttl_hours as i64));
        let claims = ShareClaims::new(&session.id, permissions, now, expires_at);
        let token = self.codec.sign(&claims)?;

        self.grants
            .insert_grant(&CreateShareGrant {
                id: claims.jti,
                session_id: session.id.clone(),
                created_by: ctx.user_id.clone(),
                permissions,
                expires_at,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            session_id = %session.id,
            token_id = %claims.jti,
            role = %claims.role(),
            "Share token issued"
        );

        Ok(CreatedShare {
            url: format!("{}/s/{}", self.public_base_url.trim_end_matches('/'), token),
            token,
            expires_at,
        })
    }

    /// Validates a share token, cache-first on the revocation lookup.
    ///
    /// The signature check always runs (it is pure and cheap); what the
    /// cache shields is the durable-store revocation round trip. All
    /// failure causes collapse into one generic message — the precise
    /// kind is logged, never returned.
    pub async fn validate(&self, token: &str) -> Result<ShareValidation, AppError> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(kind = %err.kind, "Share token rejected");
                return Ok(ShareValidation::invalid());
            }
        };

        let cache_key = keys::share_token(claims.jti);
        if let Some(payload) = self
            .caches
            .share_tokens
            .get_json::<SharedPayload>(&cache_key)?
        {
            let role = ShareRole::from_permissions(&payload.permissions);
            return Ok(ShareValidation::Valid { payload, role });
        }

        let grant = match self.grants.find_grant(claims.jti).await? {
            Some(grant) if grant.is_active(Utc::now()) => grant,
            Some(_) => {
                debug!(token_id = %claims.jti, "Share token revoked or past grant expiry");
                return Ok(ShareValidation::invalid());
            }
            None => {
                debug!(token_id = %claims.jti, "Share token has no grant record");
                return Ok(ShareValidation::invalid());
            }
        };

        let payload = SharedPayload::from(&claims);
        let ttl = self.caches.share_tokens.default_ttl();
        self.caches
            .share_tokens
            .insert_json(cache_key.as_str(), &payload, ttl)?;

        let role = ShareRole::from_permissions(&grant.permissions());
        Ok(ShareValidation::Valid { payload, role })
    }

    /// Revokes a token by id and invalidates its cache entry immediately.
    ///
    /// Cache TTL alone is not sufficient: revocation must be effective
    /// before the TTL would naturally expire.
    pub async fn revoke(&self, ctx: &RequestContext, token_id: Uuid) -> Result<(), AppError> {
        let grant = self
            .grants
            .find_grant(token_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        let owns_session = self
            .sessions
            .find_session(&grant.session_id)
            .await?
            .map(|s| s.is_owned_by(&ctx.user_id))
            .unwrap_or(false);
        if !owns_session {
            return Err(AppError::forbidden("Only the session owner can revoke it"));
        }

        self.grants.mark_revoked(token_id).await?;
        self.caches
            .share_tokens
            .invalidate(&keys::share_token(token_id));

        info!(
            user_id = %ctx.user_id,
            session_id = %grant.session_id,
            token_id = %token_id,
            "Share token revoked"
        );

        Ok(())
    }
}

impl std::fmt::Debug for ShareTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareTokenService")
            .field("default_ttl_hours", &self.default_ttl_hours)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        MemoryGrantStore, MemorySessionDirectory, auth_config, caches, request_context,
    };

    fn service_with(
        sessions: Arc<MemorySessionDirectory>,
        grants: Arc<MemoryGrantStore>,
        caches: ValidationCaches,
    ) -> ShareTokenService {
        let config = auth_config();
        ShareTokenService::new(
            Arc::new(ShareTokenCodec::new(&config)),
            sessions,
            grants,
            caches,
            &config,
            "http://localhost:3000",
        )
    }

    fn reviewer_perms() -> SharePermissions {
        SharePermissions {
            read: true,
            comment: true,
            edit: false,
        }
    }

    #[tokio::test]
    async fn test_create_then_validate() {
        let sessions = Arc::new(MemorySessionDirectory::with_session("s1", "owner-1"));
        let grants = Arc::new(MemoryGrantStore::new());
        let service = service_with(sessions, Arc::clone(&grants), caches());

        let share = service
            .create(&request_context("owner-1"), "s1", reviewer_perms(), None)
            .await
            .unwrap();
        assert!(share.url.contains(&share.token));

        match service.validate(&share.token).await.unwrap() {
            ShareValidation::Valid { payload, role } => {
                assert_eq!(payload.session_id, "s1");
                assert_eq!(payload.permissions, reviewer_perms());
                assert_eq!(role, ShareRole::Reviewer);
            }
            ShareValidation::Invalid { .. } => panic!("expected valid share"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_permission_set() {
        let sessions = Arc::new(MemorySessionDirectory::with_session("s1", "owner-1"));
        let service = service_with(sessions, Arc::new(MemoryGrantStore::new()), caches());

        let err = service
            .create(
                &request_context("owner-1"),
                "s1",
                SharePermissions::default(),
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, audithub_core::error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_by_non_owner_is_forbidden() {
        let sessions = Arc::new(MemorySessionDirectory::with_session("s1", "owner-1"));
        let service = service_with(sessions, Arc::new(MemoryGrantStore::new()), caches());

        let err = service
            .create(&request_context("intruder"), "s1", reviewer_perms(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, audithub_core::error::ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_create_for_missing_session_is_forbidden() {
        let sessions = Arc::new(MemorySessionDirectory::new());
        let service = service_with(sessions, Arc::new(MemoryGrantStore::new()), caches());

        let err = service
            .create(&request_context("owner-1"), "ghost", reviewer_perms(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, audithub_core::error::ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_validate_garbage_token_is_generic() {
        let sessions = Arc::new(MemorySessionDirectory::new());
        let service = service_with(sessions, Arc::new(MemoryGrantStore::new()), caches());

        match service.validate("garbage").await.unwrap() {
            ShareValidation::Invalid { message } => {
                assert_eq!(message, "invalid or expired share link");
            }
            ShareValidation::Valid { .. } => panic!("garbage must not validate"),
        }
    }

    #[tokio::test]
    async fn test_repeat_validate_hits_store_once() {
        let sessions = Arc::new(MemorySessionDirectory::with_session("s1", "owner-1"));
        let grants = Arc::new(MemoryGrantStore::new());
        let service = service_with(sessions, Arc::clone(&grants), caches());

        let share = service
            .create(&request_context("owner-1"), "s1", reviewer_perms(), None)
            .await
            .unwrap();

        let first = service.validate(&share.token).await.unwrap();
        let second = service.validate(&share.token).await.unwrap();
        assert!(first.is_valid());
        assert!(second.is_valid());
        // The second call was served from the cache.
        assert_eq!(grants.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_revoke_beats_warm_cache() {
        let sessions = Arc::new(MemorySessionDirectory::with_session("s1", "owner-1"));
        let grants = Arc::new(MemoryGrantStore::new());
        let service = service_with(sessions, Arc::clone(&grants), caches());
        let ctx = request_context("owner-1");

        let share = service
            .create(&ctx, "s1", reviewer_perms(), None)
            .await
            .unwrap();

        // Warm the cache moments before revocation.
        assert!(service.validate(&share.token).await.unwrap().is_valid());

        let token_id = grants.only_grant_id();
        service.revoke(&ctx, token_id).await.unwrap();

        match service.validate(&share.token).await.unwrap() {
            ShareValidation::Invalid { message } => {
                // Generic message: no mention of revocation specifically.
                assert_eq!(message, "invalid or expired share link");
            }
            ShareValidation::Valid { .. } => panic!("revoked token must not validate"),
        }
    }

    #[tokio::test]
    async fn test_revoke_by_non_owner_is_forbidden() {
        let sessions = Arc::new(MemorySessionDirectory::with_session("s1", "owner-1"));
        let grants = Arc::new(MemoryGrantStore::new());
        let service = service_with(sessions, Arc::clone(&grants), caches());

        service
            .create(&request_context("owner-1"), "s1", reviewer_perms(), None)
            .await
            .unwrap();
        let token_id = grants.only_grant_id();

        let err = service
            .revoke(&request_context("intruder"), token_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, audithub_core::error::ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_is_not_found() {
        let sessions = Arc::new(MemorySessionDirectory::new());
        let service = service_with(sessions, Arc::new(MemoryGrantStore::new()), caches());

        let err = service
            .revoke(&request_context("owner-1"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, audithub_core::error::ErrorKind::NotFound);
    }
}
