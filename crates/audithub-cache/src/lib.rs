//! # audithub-cache
//!
//! In-process TTL caches that shield the durable store and the identity
//! verifier from repeated lookups.
//!
//! Two independent instances with distinct TTLs are bundled in
//! [`ValidationCaches`]: one for verified identity claims and one for
//! verified share-token payloads. Reads always check entry expiry
//! themselves; the background sweeper only bounds memory growth from
//! abandoned keys and is never load-bearing for correctness.

pub mod caches;
pub mod keys;
pub mod store;

pub use caches::ValidationCaches;
pub use store::TtlCache;
