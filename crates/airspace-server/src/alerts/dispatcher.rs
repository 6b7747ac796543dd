//! Decoupled alert dispatch.
//!
//! Handlers hand violations to an [`AlertDispatcher`] without waiting on
//! delivery. Violations travel through a bounded channel; when it is full
//! they are parked in an overflow buffer that the worker drains next.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use airspace_core::Violation;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Notify;

type Overflow = Arc<Mutex<VecDeque<Violation>>>;

/// Sending half, held by the application state.
#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    tx: mpsc::Sender<Violation>,
    overflow: Overflow,
    overflow_capacity: usize,
    wake: Arc<Notify>,
}

/// Receiving half, owned by the alert loop.
#[derive(Debug)]
pub struct AlertQueue {
    rx: mpsc::Receiver<Violation>,
    overflow: Overflow,
    wake: Arc<Notify>,
}

pub fn alert_channel(capacity: usize) -> (AlertDispatcher, AlertQueue) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    let overflow = Overflow::default();
    let wake = Arc::new(Notify::new());
    (
        AlertDispatcher {
            tx,
            overflow: overflow.clone(),
            overflow_capacity: capacity,
            wake: wake.clone(),
        },
        AlertQueue { rx, overflow, wake },
    )
}

impl AlertDispatcher {
    /// Queue violations for delivery. Never blocks.
    pub fn enqueue(&self, violations: Vec<Violation>) {
        for violation in violations {
            match self.tx.try_send(violation) {
                Ok(()) => {}
                Err(TrySendError::Full(violation)) => {
                    self.park(violation);
                    self.wake.notify_one();
                }
                Err(TrySendError::Closed(violation)) => {
                    tracing::error!("Alert loop stopped, dropping {}", violation);
                }
            }
        }
    }

    /// Park a violation the channel had no room for. Duplicates merge and
    /// the oldest entry is evicted once the overflow is at capacity.
    fn park(&self, violation: Violation) {
        let mut overflow = self.overflow.lock().unwrap_or_else(PoisonError::into_inner);
        if overflow.contains(&violation) {
            tracing::debug!("Alert queue full, {} already parked", violation);
            return;
        }
        if overflow.len() >= self.overflow_capacity {
            if let Some(evicted) = overflow.pop_front() {
                tracing::error!("Alert overflow full, dropping {}", evicted);
            }
        }
        tracing::warn!("Alert queue full, parking {}", violation);
        overflow.push_back(violation);
    }
}

impl AlertQueue {
    /// Next violation to deliver, channel first, then overflow.
    ///
    /// Returns `None` once every dispatcher is gone and nothing is left.
    pub async fn next(&mut self) -> Option<Violation> {
        loop {
            if let Ok(violation) = self.rx.try_recv() {
                return Some(violation);
            }
            if let Some(violation) = self.pop_overflow() {
                return Some(violation);
            }
            let received = tokio::select! {
                received = self.rx.recv() => received,
                _ = self.wake.notified() => continue,
            };
            return received.or_else(|| self.pop_overflow());
        }
    }

    /// Everything still waiting, without blocking.
    pub fn drain(&mut self) -> Vec<Violation> {
        let mut pending = Vec::new();
        while let Ok(violation) = self.rx.try_recv() {
            pending.push(violation);
        }
        pending.extend(
            self.overflow
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain(..),
        );
        pending
    }

    fn pop_overflow(&self) -> Option<Violation> {
        self.overflow
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airspace_core::ViolationKind;

    fn violation(id: &str) -> Violation {
        Violation::plane(ViolationKind::CollisionImminent, id)
    }

    #[tokio::test]
    async fn delivers_in_enqueue_order() {
        let (dispatcher, mut queue) = alert_channel(8);
        dispatcher.enqueue(vec![violation("P1"), violation("P2")]);

        assert_eq!(queue.next().await, Some(violation("P1")));
        assert_eq!(queue.next().await, Some(violation("P2")));
    }

    #[tokio::test]
    async fn full_queue_parks_instead_of_dropping() {
        let (dispatcher, mut queue) = alert_channel(2);
        dispatcher.enqueue(vec![violation("P1"), violation("P2"), violation("P3")]);

        let drained = queue.drain();
        assert_eq!(drained, vec![violation("P1"), violation("P2"), violation("P3")]);
    }

    #[tokio::test]
    async fn overflow_is_bounded_by_capacity() {
        let (dispatcher, mut queue) = alert_channel(4);
        let burst: Vec<Violation> = (0..100_000).map(|i| violation(&format!("P{i}"))).collect();
        dispatcher.enqueue(burst);

        let drained = queue.drain();
        assert_eq!(drained.len(), 8);
        assert_eq!(&drained[..4], &[violation("P0"), violation("P1"), violation("P2"), violation("P3")]);
        assert_eq!(
            &drained[4..],
            &[
                violation("P99996"),
                violation("P99997"),
                violation("P99998"),
                violation("P99999"),
            ]
        );
    }

    #[tokio::test]
    async fn parked_duplicates_are_merged() {
        let (dispatcher, mut queue) = alert_channel(1);
        dispatcher.enqueue(vec![
            violation("P1"),
            violation("P2"),
            violation("P2"),
            violation("P2"),
        ]);
        dispatcher.enqueue(vec![violation("P2")]);

        assert_eq!(queue.drain(), vec![violation("P1"), violation("P2")]);
    }

    #[tokio::test]
    async fn overflow_wakes_waiting_worker() {
        let (dispatcher, mut queue) = alert_channel(1);
        dispatcher.enqueue(vec![violation("P1"), violation("P2")]);

        assert_eq!(queue.next().await, Some(violation("P1")));
        assert_eq!(queue.next().await, Some(violation("P2")));
    }

    #[tokio::test]
    async fn closed_channel_ends_queue() {
        let (dispatcher, mut queue) = alert_channel(4);
        dispatcher.enqueue(vec![violation("P1")]);
        drop(dispatcher);

        assert_eq!(queue.next().await, Some(violation("P1")));
        assert_eq!(queue.next().await, None);
    }
}
