//! Ephemeral test-session event store.
//!
//! Session identifiers carrying the reserved `test-` prefix are routed to
//! this process-lifetime, in-memory store instead of durable storage.
//! Integration testers rely on the exact prefix string; it is defined
//! once here and consumed by both ingestion and query so the two paths
//! cannot diverge.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use audithub_core::types::pagination::{Page, PageRequest};
use audithub_entity::audit::AuditEvent;

/// Reserved prefix marking a session as ephemeral. Part of the external
/// contract; must not change.
pub const TEST_SESSION_PREFIX: &str = "test-";

/// Whether a session id names an ephemeral test session.
pub fn is_ephemeral_session(session_id: &str) -> bool {
    session_id.starts_with(TEST_SESSION_PREFIX)
}

/// In-memory, per-session ordered store for test-session events.
///
/// Events live for the lifetime of the process and never touch durable
/// storage. Appends to the same session are serialized by the per-key
/// entry lock, so a single session's order is preserved even under
/// concurrent ingestion; cross-session ordering is irrelevant.
#[derive(Debug, Default)]
pub struct EphemeralEventStore {
    events: DashMap<String, Vec<AuditEvent>>,
}

impl EphemeralEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event for a test session, returning the stored record.
    ///
    /// Timestamps are nudged forward if needed so they stay strictly
    /// monotonic within the session's ingestion order.
    pub fn append(
        &self,
        session_id: &str,
        user_id: String,
        event_type: String,
        details: Value,
    ) -> AuditEvent {
        let mut entry = self.events.entry(session_id.to_string()).or_default();

        let mut timestamp = Utc::now();
        if let Some(last) = entry.last() {
            if timestamp <= last.timestamp {
                timestamp = last.timestamp + Duration::microseconds(1);
            }
        }

        let event = AuditEvent {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            user_id,
            event_type,
            details,
            timestamp,
            success: true,
        };
        entry.push(event.clone());

        debug!(
            event_id = %event.id,
            session_id,
            count = entry.len(),
            "Stored ephemeral test event"
        );

        event
    }

    /// One page of a test session's events, in ingestion order, with the
    /// same pagination contract as the durable trail.
    pub fn history(&self, session_id: &str, page: &PageRequest) -> Page<AuditEvent> {
        let Some(events) = self.events.get(session_id) else {
            return Page::empty();
        };

        let total = events.len() as u64;
        let items = events
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Page::new(total, items)
    }
}
