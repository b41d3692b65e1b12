//! Identity bearer-token verification with a validation cache in front.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use audithub_cache::{ValidationCaches, keys};
use audithub_core::config::auth::AuthConfig;
use audithub_core::error::AppError;

use super::claims::IdentityClaims;

/// Verifies a bearer credential into identity claims.
///
/// Implemented over the external identity provider's JWTs; injected as a
/// trait object so services and tests can substitute their own resolver.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Exchange a bearer credential for verified claims.
    ///
    /// Fails with `Unauthorized` for any credential that cannot be
    /// verified; the precise cause is logged, not returned.
    async fn verify_bearer(&self, token: &str) -> Result<IdentityClaims, AppError>;
}

/// JWT-based identity verification, cache-first.
///
/// Verified claims are cached under a hash of the credential for the
/// identity TTL (capped to the token's own remaining lifetime), shielding
/// the signature check from per-request repetition.
#[derive(Clone)]
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    caches: ValidationCaches,
}

impl std::fmt::Debug for JwtIdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtIdentityVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig, caches: ValidationCaches) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.identity_jwt_secret.as_bytes()),
            validation,
            caches,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<IdentityClaims, AppError> {
        let data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Identity token verification failed");
                AppError::unauthorized("Invalid or expired credential")
            })?;
        Ok(data.claims)
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify_bearer(&self, token: &str) -> Result<IdentityClaims, AppError> {
        let key = keys::identity(token);

        if let Some(claims) = self.caches.identity.get_json::<IdentityClaims>(&key)? {
            return Ok(claims);
        }

        let claims = self.decode_claims(token)?;

        // Cache for the identity TTL, but never past the token's own expiry.
        let remaining = (claims.exp - Utc::now().timestamp()).max(0) as u64;
        let ttl = self
            .caches
            .identity
            .default_ttl()
            .min(Duration::from_secs(remaining));
        self.caches.identity.insert_json(key.as_str(), &claims, ttl)?;

        Ok(claims)
    }
}
