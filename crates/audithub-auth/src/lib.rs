//! # audithub-auth
//!
//! Authentication primitives for AuditHub: the share-token codec (compact
//! signed tokens carrying session id, permission set, and expiry) and
//! identity verification (bearer credential → verified claims), the
//! latter fronted by the identity validation cache.

pub mod identity;
pub mod token;

pub use identity::verifier::{IdentityVerifier, JwtIdentityVerifier};
pub use token::claims::ShareClaims;
pub use token::codec::ShareTokenCodec;
