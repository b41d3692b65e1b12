//! Audit trail pagination configuration.

use serde::{Deserialize, Serialize};

/// Audit trail query configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Page size applied when the caller does not specify a limit.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Hard upper bound on the page size; larger requests are clamped.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    100
}
