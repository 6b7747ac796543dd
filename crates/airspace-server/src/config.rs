//! Server configuration from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// External monitoring endpoint; alerts are only logged when unset
    pub alert_url: Option<String>,
    /// Identifier placed in every alert payload
    pub team_id: String,
    pub alert_timeout_ms: u64,
    pub alert_queue_capacity: usize,
    /// Directory holding the CSV datasets loaded at startup
    pub fixture_dir: Option<PathBuf>,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            alert_url: None,
            team_id: "airspace".to_string(),
            alert_timeout_ms: 5_000,
            alert_queue_capacity: 1024,
            fixture_dir: None,
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("AIRSPACE_PORT").unwrap_or(defaults.server_port),
            alert_url: non_empty_env("AIRSPACE_ALERT_URL"),
            team_id: non_empty_env("AIRSPACE_TEAM_ID").unwrap_or(defaults.team_id),
            alert_timeout_ms: parse_env("AIRSPACE_ALERT_TIMEOUT_MS")
                .unwrap_or(defaults.alert_timeout_ms),
            alert_queue_capacity: parse_env("AIRSPACE_ALERT_QUEUE")
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.alert_queue_capacity),
            fixture_dir: non_empty_env("AIRSPACE_FIXTURE_DIR").map(PathBuf::from),
            log_json: env::var("AIRSPACE_LOG_JSON")
                .map(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn alert_timeout(&self) -> Duration {
        Duration::from_millis(self.alert_timeout_ms)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
