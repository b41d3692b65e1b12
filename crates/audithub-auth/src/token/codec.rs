//! Share token signing and verification.
//!
//! The codec is stateless and side-effect free; it is safe to call
//! concurrently without synchronization. Verification failures carry
//! precise kinds (`TokenMalformed`, `TokenSignature`, `TokenExpired`)
//! which callers higher up collapse into a generic user-facing message.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use audithub_core::config::auth::AuthConfig;
use audithub_core::error::{AppError, ErrorKind};

use super::claims::ShareClaims;

/// Signs and verifies compact share tokens (HMAC-SHA256).
#[derive(Clone)]
pub struct ShareTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for ShareTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareTokenCodec")
            .field("validation", &self.validation)
            .finish()
    }
}

impl ShareTokenCodec {
    /// Creates a new codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(config.share_token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.share_token_secret.as_bytes()),
            validation,
        }
    }

    /// Signs the given claims into a compact token string.
    ///
    /// Rejects payloads with an empty session id or an expiry that is not
    /// in the future.
    pub fn sign(&self, claims: &ShareClaims) -> Result<String, AppError> {
        if claims.sid.is_empty() {
            return Err(AppError::validation("Share token requires a session id"));
        }
        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::validation(
                "Share token expiry must be in the future",
            ));
        }

        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode share token: {e}")))
    }

    /// Verifies a token string and returns its claims.
    ///
    /// Fails closed with a precise kind:
    /// - [`ErrorKind::TokenMalformed`] — structural encoding is broken
    /// - [`ErrorKind::TokenSignature`] — integrity check failed
    /// - [`ErrorKind::TokenExpired`] — `exp` has passed
    pub fn verify(&self, token: &str) -> Result<ShareClaims, AppError> {
        let data = decode::<ShareClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::new(ErrorKind::TokenExpired, "Share token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::new(
                    ErrorKind::TokenSignature,
                    "Share token signature is invalid",
                ),
                _ => AppError::new(ErrorKind::TokenMalformed, "Share token is malformed"),
            },
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audithub_entity::share::SharePermissions;
    use chrono::Duration;

    fn config() -> AuthConfig {
        AuthConfig {
            identity_jwt_secret: "identity-secret".to_string(),
            share_token_secret: "share-secret".to_string(),
            share_token_ttl_hours: 24,
            leeway_seconds: 5,
        }
    }

    fn claims(expires_in: Duration) -> ShareClaims {
        let now = Utc::now();
        ShareClaims::new(
            "session-1",
            SharePermissions {
                read: true,
                comment: true,
                edit: false,
            },
            now,
            now + expires_in,
        )
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let codec = ShareTokenCodec::new(&config());
        let original = claims(Duration::hours(1));
        let token = codec.sign(&original).unwrap();
        let verified = codec.verify(&token).unwrap();
        assert_eq!(verified, original);
    }

    #[test]
    fn test_sign_rejects_past_expiry() {
        let codec = ShareTokenCodec::new(&config());
        let stale = claims(Duration::hours(-1));
        let err = codec.sign(&stale).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_sign_rejects_empty_session_id() {
        let codec = ShareTokenCodec::new(&config());
        let mut bad = claims(Duration::hours(1));
        bad.sid.clear();
        let err = codec.sign(&bad).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_verify_malformed_token() {
        let codec = ShareTokenCodec::new(&config());
        let err = codec.verify("not-a-token").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenMalformed);
    }

    #[test]
    fn test_verify_wrong_secret() {
        let codec = ShareTokenCodec::new(&config());
        let token = codec.sign(&claims(Duration::hours(1))).unwrap();

        let mut other = config();
        other.share_token_secret = "a-different-secret".to_string();
        let err = ShareTokenCodec::new(&other).verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenSignature);
    }

    #[test]
    fn test_verify_expired_token() {
        let codec = ShareTokenCodec::new(&config());
        // Encode directly to bypass sign()'s expiry guard.
        let stale = claims(Duration::hours(-1));
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(config().share_token_secret.as_bytes()),
        )
        .unwrap();
        let err = codec.verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenExpired);
    }
}
