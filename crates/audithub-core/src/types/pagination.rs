//! Pagination types for audit-trail list endpoints.
//!
//! Audit history is paginated by `limit`/`offset` to match the wire
//! contract of the ingestion clients. An out-of-range `limit` is clamped,
//! never rejected.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    pub limit: u64,
    /// Number of items to skip from the start of the trail.
    pub offset: u64,
}

impl PageRequest {
    /// Build a page request from raw (possibly absent) query values.
    ///
    /// A missing or zero `limit` falls back to `default_limit`; a value
    /// above `max_limit` is clamped down to it.
    pub fn clamped(
        limit: Option<u64>,
        offset: Option<u64>,
        default_limit: u64,
        max_limit: u64,
    ) -> Self {
        let limit = match limit {
            None | Some(0) => default_limit,
            Some(n) => n.min(max_limit),
        };
        Self {
            limit,
            offset: offset.unwrap_or(0),
        }
    }

    /// Re-apply bounds to an already-constructed request.
    pub fn bounded(self, default_limit: u64, max_limit: u64) -> Self {
        Self::clamped(Some(self.limit), Some(self.offset), default_limit, max_limit)
    }
}

/// Paginated response wrapper: the total count plus one page of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    /// Total number of items across all pages.
    pub total_count: u64,
    /// The items on this page.
    pub items: Vec<T>,
}

impl<T: Serialize> Page<T> {
    /// Create a new page.
    pub fn new(total_count: u64, items: Vec<T>) -> Self {
        Self { total_count, items }
    }

    /// Create an empty page.
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            items: Vec::new(),
        }
    }
}
