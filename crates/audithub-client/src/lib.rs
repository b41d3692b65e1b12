//! # audithub-client
//!
//! Client-side resilience layer for audit event submission.
//!
//! Events are buffered locally while the network or service is
//! unavailable and drained strictly FIFO once connectivity returns, so a
//! session's audit trail reaches the server in the order the user
//! produced it. Delivery is at-least-once: an unconfirmed attempt is
//! retried, and the server may consequently observe duplicates.

pub mod queue;
pub mod runner;
pub mod sink;

pub use queue::{AuditEventQueue, DrainReport, QueuedEvent};
pub use runner::DrainRunner;
pub use sink::{EventDraft, EventReceipt, EventSink, HttpEventSink};
