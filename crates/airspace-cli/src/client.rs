//! HTTP client for the airspace event endpoints.

use anyhow::{bail, Result};
use serde::Serialize;

use airspace_core::{GateUpdate, HeadingUpdate, PassengerCountUpdate, RunwayUpdate};

/// Client for publishing events to the airspace server.
pub struct EventClient {
    base_url: String,
    client: reqwest::Client,
}

impl EventClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn send_heading(&self, update: &HeadingUpdate) -> Result<()> {
        self.post("/api/headings", update).await
    }

    pub async fn send_gate(&self, update: &GateUpdate) -> Result<()> {
        self.post("/api/gates", update).await
    }

    pub async fn send_runway(&self, update: &RunwayUpdate) -> Result<()> {
        self.post("/api/runways", update).await
    }

    pub async fn send_passenger_count(&self, update: &PassengerCountUpdate) -> Result<()> {
        self.post("/api/counts", update).await
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("{} rejected event ({}): {}", url, status, text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn spawn_server() -> (String, Received) {
        let received: Received = Arc::default();
        let sink = received.clone();
        let app = Router::new()
            .route(
                "/api/counts",
                post(move |Json(body): Json<Value>| {
                    let sink = sink.clone();
                    async move {
                        let known = body["plane"] == "P1";
                        sink.lock().unwrap().push(body);
                        if known {
                            (StatusCode::OK, Json(json!({})))
                        } else {
                            (StatusCode::NOT_FOUND, Json(json!({ "error": "plane not found" })))
                        }
                    }
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/", addr), received)
    }

    #[tokio::test]
    async fn test_posts_event_body() {
        let (url, received) = spawn_server().await;
        let client = EventClient::new(url);

        client
            .send_passenger_count(&PassengerCountUpdate {
                plane: "P1".into(),
                passenger_count: 42,
            })
            .await
            .unwrap();

        assert_eq!(
            received.lock().unwrap().clone(),
            vec![json!({ "plane": "P1", "passenger_count": 42 })]
        );
    }

    #[tokio::test]
    async fn test_rejected_event_is_an_error() {
        let (url, _received) = spawn_server().await;
        let client = EventClient::new(url);

        let err = client
            .send_passenger_count(&PassengerCountUpdate {
                plane: "ghost".into(),
                passenger_count: 1,
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
    }
}
