//! The pair of validation caches plus their background sweeper.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use audithub_core::config::cache::CacheConfig;

use crate::store::TtlCache;

/// The two validation caches used by the access-control path.
///
/// Identity claims and share-token payloads are cached in independent
/// instances with different TTLs: identity tokens are harder to mint and
/// rotate, while share-link revocation must propagate within a minute.
/// Constructed once at startup and injected into services; never a
/// process-wide singleton.
#[derive(Debug, Clone)]
pub struct ValidationCaches {
    /// Verified identity claims, keyed by hashed bearer token.
    pub identity: Arc<TtlCache>,
    /// Verified share-token payloads, keyed by token id.
    pub share_tokens: Arc<TtlCache>,
}

impl ValidationCaches {
    /// Build both caches from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            identity: Arc::new(TtlCache::new(Duration::from_secs(
                config.identity_ttl_seconds,
            ))),
            share_tokens: Arc::new(TtlCache::new(Duration::from_secs(
                config.share_token_ttl_seconds,
            ))),
        }
    }

    /// Spawn the fixed-interval background sweep over both caches.
    ///
    /// The sweeper bounds memory growth from abandoned keys; reads check
    /// expiry themselves, so correctness never depends on sweep timing.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let caches = self.clone();
        info!(interval_seconds = interval.as_secs(), "Starting cache sweeper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so the sweep
            // cadence starts one interval after startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let identity_removed = caches.identity.sweep();
                let share_removed = caches.share_tokens.sweep();
                debug!(
                    identity_removed,
                    share_removed,
                    identity_len = caches.identity.len(),
                    share_len = caches.share_tokens.len(),
                    "Cache sweep complete"
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CacheConfig {
        CacheConfig {
            identity_ttl_seconds: 300,
            share_token_ttl_seconds: 60,
            sweep_interval_seconds: 600,
        }
    }

    #[test]
    fn test_caches_have_distinct_ttls() {
        let caches = ValidationCaches::new(&config());
        assert_eq!(caches.identity.default_ttl(), Duration::from_secs(300));
        assert_eq!(caches.share_tokens.default_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_caches_are_independent() {
        let caches = ValidationCaches::new(&config());
        caches.identity.insert_default("k", "identity-value");
        assert_eq!(caches.share_tokens.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_expired_entries() {
        let caches = ValidationCaches::new(&config());
        caches
            .share_tokens
            .insert("stale", "v", Duration::from_secs(0));
        let handle = caches.spawn_sweeper(Duration::from_secs(1));

        // Let the sweeper pass at least once.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(caches.share_tokens.len(), 0);
        handle.abort();
    }
}
