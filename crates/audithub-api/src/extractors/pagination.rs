//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use audithub_core::config::audit::AuditConfig;
use audithub_core::types::pagination::PageRequest;

/// Query parameters for the paginated history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Maximum items per page. Clamped to the configured maximum.
    pub limit: Option<u64>,
    /// Items to skip from the start of the trail.
    pub offset: Option<u64>,
    /// Share token presented instead of an identity credential.
    pub share_token: Option<String>,
}

impl PaginationParams {
    /// Converts to a bounded `PageRequest` using the configured limits.
    pub fn into_page_request(&self, config: &AuditConfig) -> PageRequest {
        PageRequest::clamped(
            self.limit,
            self.offset,
            config.default_page_size,
            config.max_page_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<u64>, offset: Option<u64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            share_token: None,
        }
    }

    #[test]
    fn test_defaults() {
        let page = params(None, None).into_page_request(&AuditConfig::default());
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_clamp_to_configured_max() {
        let page = params(Some(500), None).into_page_request(&AuditConfig::default());
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn test_explicit_values_pass_through() {
        let page = params(Some(10), Some(40)).into_page_request(&AuditConfig::default());
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 40);
    }
}
