//! Alert sinks: where violation reports end up.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use airspace_core::AlertPayload;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::sync::Notify;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("alert endpoint returned {0}")]
    Status(StatusCode),
    #[error("alert sink unavailable: {0}")]
    Unavailable(String),
}

/// One-way reporter of violations to an external system.
pub trait AlertSink: Send + Sync {
    fn report<'a>(&'a self, payload: &'a AlertPayload) -> BoxFuture<'a, Result<(), AlertError>>;
}

/// Posts each payload as JSON to the monitoring endpoint.
pub struct HttpAlertSink {
    client: Client,
    url: String,
}

impl HttpAlertSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AlertError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl AlertSink for HttpAlertSink {
    fn report<'a>(&'a self, payload: &'a AlertPayload) -> BoxFuture<'a, Result<(), AlertError>> {
        async move {
            tracing::info!(
                error = %payload.error,
                plane = %payload.id,
                "Sending alert to {}",
                self.url
            );
            let response = self.client.post(&self.url).json(payload).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AlertError::Status(status));
            }
            Ok(())
        }
        .boxed()
    }
}

/// Logs alerts without sending them anywhere.
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn report<'a>(&'a self, payload: &'a AlertPayload) -> BoxFuture<'a, Result<(), AlertError>> {
        tracing::info!(
            team_id = %payload.team_id,
            error = %payload.error,
            plane = %payload.id,
            "Alert (no endpoint configured)"
        );
        futures::future::ready(Ok(())).boxed()
    }
}

/// Records alerts in memory. Used to observe alert traffic in tests.
#[derive(Debug, Default)]
pub struct MemoryAlertSink {
    payloads: Mutex<Vec<AlertPayload>>,
    notify: Notify,
}

impl MemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payloads(&self) -> Vec<AlertPayload> {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wait until at least `count` alerts arrived or `timeout` elapsed, then
    /// return everything recorded so far.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<AlertPayload> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            let payloads = self.payloads();
            if payloads.len() >= count {
                return payloads;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.payloads();
            }
        }
    }
}

impl AlertSink for MemoryAlertSink {
    fn report<'a>(&'a self, payload: &'a AlertPayload) -> BoxFuture<'a, Result<(), AlertError>> {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());
        self.notify.notify_waiters();
        futures::future::ready(Ok(())).boxed()
    }
}
