//! Alert delivery loop.
//!
//! Drains the alert queue and hands each violation to the sink, one at a
//! time. Failures are logged and dropped; there is no retry.

use std::sync::Arc;

use tokio::sync::broadcast;

use airspace_core::{AlertPayload, Violation};

use crate::alerts::{AlertQueue, AlertSink};

pub async fn run_alert_loop(
    mut queue: AlertQueue,
    sink: Arc<dyn AlertSink>,
    team_id: String,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Alert loop shutting down");
                break;
            }
            next = queue.next() => {
                match next {
                    Some(violation) => deliver(sink.as_ref(), &team_id, &violation).await,
                    None => {
                        tracing::info!("Alert channel closed");
                        break;
                    }
                }
            }
        }
    }

    let pending = queue.drain();
    if !pending.is_empty() {
        tracing::info!("Delivering {} pending alert(s) before exit", pending.len());
    }
    for violation in pending {
        deliver(sink.as_ref(), &team_id, &violation).await;
    }
}

async fn deliver(sink: &dyn AlertSink, team_id: &str, violation: &Violation) {
    let payload = AlertPayload::new(team_id, violation);
    match sink.report(&payload).await {
        Ok(()) => tracing::debug!("Delivered {}", violation),
        Err(err) => tracing::error!("Failed to deliver {}: {}", violation, err),
    }
}
