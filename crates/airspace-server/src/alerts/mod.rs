//! Alert delivery: sinks and the queue feeding them.

pub mod dispatcher;
pub mod sink;

use std::sync::Arc;

pub use dispatcher::{alert_channel, AlertDispatcher, AlertQueue};
pub use sink::{AlertError, AlertSink, HttpAlertSink, LogAlertSink, MemoryAlertSink};

use crate::config::Config;

/// HTTP sink when an endpoint is configured, log sink otherwise.
pub fn sink_from_config(config: &Config) -> Result<Arc<dyn AlertSink>, AlertError> {
    match &config.alert_url {
        Some(url) => {
            tracing::info!("Alerts will be posted to {}", url);
            Ok(Arc::new(HttpAlertSink::new(url.clone(), config.alert_timeout())?))
        }
        None => {
            tracing::warn!("AIRSPACE_ALERT_URL not set, alerts will only be logged");
            Ok(Arc::new(LogAlertSink))
        }
    }
}
