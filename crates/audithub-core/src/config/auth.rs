//! Token signing and identity verification configuration.

use serde::{Deserialize, Serialize};

/// Authentication and token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to verify identity bearer tokens (HMAC-SHA256).
    #[serde(default = "default_identity_secret")]
    pub identity_jwt_secret: String,
    /// Secret used to sign and verify share tokens (HMAC-SHA256).
    #[serde(default = "default_share_secret")]
    pub share_token_secret: String,
    /// Default share token lifetime in hours when the issuer does not
    /// specify an expiry.
    #[serde(default = "default_share_ttl")]
    pub share_token_ttl_hours: u64,
    /// Clock-skew leeway in seconds applied during verification.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_identity_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_share_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_share_ttl() -> u64 {
    24
}

fn default_leeway() -> u64 {
    5
}
