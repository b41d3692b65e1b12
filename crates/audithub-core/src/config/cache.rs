//! Validation cache configuration.
//!
//! Two independent caches front the durable store: one for verified
//! identity claims and one for verified share-token payloads. Identity
//! entries live longer because identity tokens are harder to mint and
//! rotate; share-token entries stay short so revocation propagates fast.

use serde::{Deserialize, Serialize};

/// Validation cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for verified identity claims, in seconds.
    #[serde(default = "default_identity_ttl")]
    pub identity_ttl_seconds: u64,
    /// TTL for verified share-token payloads, in seconds.
    #[serde(default = "default_share_token_ttl")]
    pub share_token_ttl_seconds: u64,
    /// Interval between background sweeps of expired entries, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            identity_ttl_seconds: default_identity_ttl(),
            share_token_ttl_seconds: default_share_token_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_identity_ttl() -> u64 {
    300
}

fn default_share_token_ttl() -> u64 {
    60
}

fn default_sweep_interval() -> u64 {
    600
}
