//! Durable local event buffer with strict-FIFO drain.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use audithub_core::error::ErrorKind;

use crate::sink::{EventDraft, EventSink};

/// Default cap on delivery attempts before an event is dead-lettered.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// A buffered event with its delivery bookkeeping.
#[derive(Debug, Clone)]
pub struct QueuedEvent {
    /// The event awaiting submission.
    pub draft: EventDraft,
    /// Number of failed delivery attempts so far.
    pub attempts: u32,
    /// When the event entered the queue.
    pub enqueued_at: DateTime<Utc>,
}

/// Outcome of one drain cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Events confirmed by the service and removed from the queue.
    pub delivered: usize,
    /// Events moved to the dead-letter list this cycle.
    pub dead_lettered: usize,
    /// Whether the drain stopped early on a retryable head failure.
    pub halted: bool,
}

/// Client-side audit event queue.
///
/// `enqueue` is synchronous and always succeeds; `drain` walks the buffer
/// strictly FIFO and never skips ahead: a stuck head blocks later events
/// until it succeeds or is discarded by policy, preserving the order the
/// user produced. State lives in the buffer, not in any in-flight call,
/// so a drain may be cancelled between attempts without losing events.
#[derive(Debug)]
pub struct AuditEventQueue<S: EventSink> {
    sink: S,
    pending: VecDeque<QueuedEvent>,
    dead_letter: Vec<QueuedEvent>,
    max_attempts: u32,
}

impl<S: EventSink> AuditEventQueue<S> {
    /// Create a queue delivering through the given sink.
    pub fn new(sink: S) -> Self {
        Self::with_max_attempts(sink, DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a queue with a custom dead-letter threshold.
    pub fn with_max_attempts(sink: S, max_attempts: u32) -> Self {
        Self {
            sink,
            pending: VecDeque::new(),
            dead_letter: Vec::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Buffer an event. Synchronous; always succeeds.
    pub fn enqueue(&mut self, draft: EventDraft) {
        self.pending.push_back(QueuedEvent {
            draft,
            attempts: 0,
            enqueued_at: Utc::now(),
        });
        debug!(pending = self.pending.len(), "Event enqueued");
    }

    /// Number of events awaiting delivery.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Events discarded after exhausting their attempts or hitting a
    /// permission error. Kept for the caller to surface, never silently
    /// dropped.
    pub fn dead_letter(&self) -> &[QueuedEvent] {
        &self.dead_letter
    }

    /// Deliver buffered events in FIFO order.
    ///
    /// An event is removed only on a confirmed ingestion response. On a
    /// retryable failure the head's `attempts` counter increments and the
    /// drain stops — unless the counter has reached the maximum, in which
    /// case the event moves to the dead-letter list and draining
    /// continues. `Unauthorized`/`Forbidden` dead-letter immediately: a
    /// permission error will not resolve itself by waiting.
    pub async fn drain(&mut self) -> DrainReport {
        let mut report = DrainReport::default();

        while let Some(head) = self.pending.front() {
            let result = self.sink.submit(&head.draft).await;
            let Some(mut event) = self.pending.pop_front() else {
                break;
            };

            match result {
                Ok(receipt) => {
                    report.delivered += 1;
                    debug!(
                        event_id = %receipt.id,
                        remaining = self.pending.len(),
                        "Event delivered"
                    );
                }
                Err(err) if matches!(err.kind, ErrorKind::Unauthorized | ErrorKind::Forbidden) => {
                    event.attempts += 1;
                    warn!(
                        kind = %err.kind,
                        session_id = %event.draft.session_id,
                        "Permission error; event dead-lettered"
                    );
                    self.dead_letter.push(event);
                    report.dead_lettered += 1;
                }
                Err(err) => {
                    event.attempts += 1;
                    if event.attempts >= self.max_attempts {
                        warn!(
                            kind = %err.kind,
                            attempts = event.attempts,
                            session_id = %event.draft.session_id,
                            "Max attempts exceeded; event dead-lettered"
                        );
                        self.dead_letter.push(event);
                        report.dead_lettered += 1;
                    } else {
                        debug!(
                            kind = %err.kind,
                            attempts = event.attempts,
                            "Head delivery failed; drain halted to preserve order"
                        );
                        // Back to the front: the queue never skips ahead.
                        self.pending.push_front(event);
                        report.halted = true;
                        break;
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::EventReceipt;
    use async_trait::async_trait;
    use audithub_core::error::AppError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Scriptable sink: fails the first `failures` submissions with the
    /// given kind, then accepts everything, recording delivery order.
    struct ScriptedSink {
        failures: AtomicUsize,
        failure_kind: ErrorKind,
        delivered: Mutex<Vec<String>>,
    }

    impl ScriptedSink {
        fn accepting() -> Self {
            Self::failing(0, ErrorKind::ServiceUnavailable)
        }

        fn failing(failures: usize, failure_kind: ErrorKind) -> Self {
            Self {
                failures: AtomicUsize::new(failures),
                failure_kind,
                delivered: Mutex::new(Vec::new()),
            }
        }

        fn delivered(&self) -> Vec<String> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventSink for ScriptedSink {
        async fn submit(&self, draft: &EventDraft) -> Result<EventReceipt, AppError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(AppError::new(self.failure_kind, "scripted failure"));
            }
            self.delivered.lock().unwrap().push(draft.event_type.clone());
            Ok(EventReceipt {
                id: Uuid::new_v4(),
                session_id: draft.session_id.clone(),
                user_id: "u1".to_string(),
                event_type: draft.event_type.clone(),
                timestamp: Utc::now(),
                success: true,
            })
        }
    }

    fn draft(event_type: &str) -> EventDraft {
        EventDraft {
            session_id: "s1".to_string(),
            event_type: event_type.to_string(),
            details: serde_json::Value::Null,
            user_id: None,
            share_token: None,
        }
    }

    #[tokio::test]
    async fn test_drain_delivers_in_fifo_order() {
        let mut queue = AuditEventQueue::new(ScriptedSink::accepting());
        queue.enqueue(draft("e1"));
        queue.enqueue(draft("e2"));
        queue.enqueue(draft("e3"));

        let report = queue.drain().await;
        assert_eq!(report.delivered, 3);
        assert!(!report.halted);
        assert_eq!(queue.pending_len(), 0);
        assert_eq!(queue.sink.delivered(), vec!["e1", "e2", "e3"]);
    }

    #[tokio::test]
    async fn test_failing_head_blocks_later_events() {
        let mut queue =
            AuditEventQueue::new(ScriptedSink::failing(1, ErrorKind::ServiceUnavailable));
        queue.enqueue(draft("e1"));
        queue.enqueue(draft("e2"));

        let report = queue.drain().await;
        assert_eq!(report.delivered, 0);
        assert!(report.halted);
        assert_eq!(queue.pending_len(), 2);
        // The head carries the attempt count; nothing was skipped.
        assert_eq!(queue.pending.front().unwrap().attempts, 1);
        assert!(queue.sink.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_head_success_on_retry_flushes_the_rest() {
        let mut queue =
            AuditEventQueue::new(ScriptedSink::failing(1, ErrorKind::ServiceUnavailable));
        queue.enqueue(draft("e1"));
        queue.enqueue(draft("e2"));

        assert!(queue.drain().await.halted);
        let report = queue.drain().await;
        assert_eq!(report.delivered, 2);
        assert_eq!(queue.sink.delivered(), vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_max_attempts_dead_letters_and_unblocks() {
        let sink = ScriptedSink::failing(3, ErrorKind::ServiceUnavailable);
        let mut queue = AuditEventQueue::with_max_attempts(sink, 3);
        queue.enqueue(draft("stuck"));
        queue.enqueue(draft("next"));

        // Two halted cycles, then the third failure dead-letters the head
        // and the drain continues with the next event.
        assert!(queue.drain().await.halted);
        assert!(queue.drain().await.halted);
        let report = queue.drain().await;
        assert_eq!(report.dead_lettered, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(queue.dead_letter().len(), 1);
        assert_eq!(queue.dead_letter()[0].draft.event_type, "stuck");
        assert_eq!(queue.sink.delivered(), vec!["next"]);
    }

    #[tokio::test]
    async fn test_forbidden_dead_letters_immediately() {
        let mut queue = AuditEventQueue::new(ScriptedSink::failing(1, ErrorKind::Forbidden));
        queue.enqueue(draft("rejected"));
        queue.enqueue(draft("ok"));

        let report = queue.drain().await;
        assert_eq!(report.dead_lettered, 1);
        assert_eq!(report.delivered, 1);
        assert!(!report.halted);
        assert_eq!(queue.dead_letter()[0].draft.event_type, "rejected");
    }

    #[tokio::test]
    async fn test_unauthorized_dead_letters_immediately() {
        let mut queue = AuditEventQueue::new(ScriptedSink::failing(1, ErrorKind::Unauthorized));
        queue.enqueue(draft("rejected"));

        let report = queue.drain().await;
        assert_eq!(report.dead_lettered, 1);
        assert_eq!(queue.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_during_halted_state_preserves_order() {
        let mut queue =
            AuditEventQueue::new(ScriptedSink::failing(1, ErrorKind::ServiceUnavailable));
        queue.enqueue(draft("e1"));
        assert!(queue.drain().await.halted);

        queue.enqueue(draft("e2"));
        let report = queue.drain().await;
        assert_eq!(report.delivered, 2);
        assert_eq!(queue.sink.delivered(), vec!["e1", "e2"]);
    }
}
