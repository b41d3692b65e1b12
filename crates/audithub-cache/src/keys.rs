//! Cache key builders for all AuditHub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Prefix applied to all AuditHub cache keys.
const PREFIX: &str = "audithub";

/// Cache key for verified identity claims, derived from the bearer token.
///
/// The raw credential never becomes a key; it is hashed first so cache
/// introspection or logs cannot leak it.
pub fn identity(bearer_token: &str) -> String {
    let digest = Sha256::digest(bearer_token.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{PREFIX}:identity:{hex}")
}

/// Cache key for a verified share-token payload, keyed by token id.
///
/// Keying by `jti` rather than the raw token lets revocation invalidate
/// the entry without having the original token string in hand.
pub fn share_token(token_id: Uuid) -> String {
    format!("{PREFIX}:share:token:{token_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_token_key() {
        assert_eq!(
            share_token(Uuid::nil()),
            "audithub:share:token:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_identity_key_hides_the_credential() {
        let key = identity("very-secret-bearer");
        assert!(key.starts_with("audithub:identity:"));
        assert!(!key.contains("very-secret-bearer"));
    }

    #[test]
    fn test_identity_key_is_stable() {
        assert_eq!(identity("token-a"), identity("token-a"));
        assert_ne!(identity("token-a"), identity("token-b"));
    }
}
