//! Drain loop — drives the queue on a timer and on connectivity signals.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info};

use crate::queue::AuditEventQueue;
use crate::sink::EventSink;

/// Drives an [`AuditEventQueue`] until cancelled.
///
/// A drain cycle runs on every tick of the periodic timer and whenever
/// the connectivity signal flips to online. Cancellation takes effect
/// between attempts; queued state survives because it lives in the
/// buffer, not in the in-flight call.
#[derive(Debug)]
pub struct DrainRunner<S: EventSink> {
    queue: AuditEventQueue<S>,
    interval: Duration,
}

impl<S: EventSink> DrainRunner<S> {
    /// Create a runner draining the given queue every `interval`.
    pub fn new(queue: AuditEventQueue<S>, interval: Duration) -> Self {
        Self { queue, interval }
    }

    /// Run until the cancel signal flips to `true`. Returns the queue so
    /// the caller can inspect or persist whatever is still buffered.
    pub async fn run(
        mut self,
        mut cancel: watch::Receiver<bool>,
        mut connectivity: watch::Receiver<bool>,
    ) -> AuditEventQueue<S> {
        info!(
            interval_seconds = self.interval.as_secs(),
            "Audit drain runner started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!(
                            pending = self.queue.pending_len(),
                            "Drain runner cancelled"
                        );
                        break;
                    }
                }
                changed = Self::online_signal(&mut connectivity) => {
                    // Connectivity restored: drain immediately rather than
                    // waiting out the timer.
                    if changed {
                        self.drain_once(&connectivity).await;
                    }
                }
                _ = ticker.tick() => {
                    self.drain_once(&connectivity).await;
                }
            }
        }

        self.queue
    }

    /// Resolves `true` when the connectivity signal flips to online.
    /// Never resolves once the sender is gone, leaving the timer as the
    /// only drain trigger instead of spinning on a closed channel.
    async fn online_signal(connectivity: &mut watch::Receiver<bool>) -> bool {
        match connectivity.changed().await {
            Ok(()) => *connectivity.borrow(),
            Err(_) => std::future::pending().await,
        }
    }

    async fn drain_once(&mut self, connectivity: &watch::Receiver<bool>) {
        if !*connectivity.borrow() {
            debug!(
                pending = self.queue.pending_len(),
                "Offline; skipping drain cycle"
            );
            return;
        }
        if self.queue.pending_len() == 0 {
            return;
        }

        let report = self.queue.drain().await;
        debug!(
            delivered = report.delivered,
            dead_lettered = report.dead_lettered,
            halted = report.halted,
            pending = self.queue.pending_len(),
            "Drain cycle complete"
        );
    }
}
