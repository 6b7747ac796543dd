//! REST API routes.
//!
//! Event endpoints acknowledge with `200 {}` once the event is applied.
//! Violations never change the response; they go to the alert queue.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use airspace_core::{
    EngineError, GateUpdate, HeadingUpdate, PassengerCountUpdate, Plane, RunwayUpdate,
};

use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/headings", post(receive_heading))
        .route("/api/gates", post(receive_gate))
        .route("/api/runways", post(receive_runway))
        .route("/api/counts", post(receive_passenger_count))
        .route("/v1/planes", get(list_planes))
        .route("/v1/planes/:plane_id", get(get_plane))
        .route("/health", get(health))
}

async fn receive_heading(
    State(state): State<Arc<AppState>>,
    Json(update): Json<HeadingUpdate>,
) -> (StatusCode, Json<Value>) {
    acknowledge(state.handle_heading(&update))
}

async fn receive_gate(
    State(state): State<Arc<AppState>>,
    Json(update): Json<GateUpdate>,
) -> (StatusCode, Json<Value>) {
    acknowledge(state.handle_gate(&update))
}

async fn receive_runway(
    State(state): State<Arc<AppState>>,
    Json(update): Json<RunwayUpdate>,
) -> (StatusCode, Json<Value>) {
    acknowledge(state.handle_runway(&update))
}

async fn receive_passenger_count(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PassengerCountUpdate>,
) -> (StatusCode, Json<Value>) {
    acknowledge(state.handle_passenger_count(&update))
}

/// Map an applied event to its response. Unknown references reject the
/// event without touching any state.
fn acknowledge(outcome: Result<usize, EngineError>) -> (StatusCode, Json<Value>) {
    match outcome {
        Ok(_) => (StatusCode::OK, Json(json!({}))),
        Err(err @ EngineError::NotFound { .. }) => {
            tracing::warn!("Rejected event: {}", err);
            (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() })))
        }
        Err(err) => {
            tracing::error!("Event failed: {}", err);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListPlanesQuery {
    airline: Option<String>,
}

async fn list_planes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPlanesQuery>,
) -> Json<Vec<Plane>> {
    let planes = state.get_all_planes();

    let filtered = match query.airline {
        Some(airline) => planes
            .into_iter()
            .filter(|plane| plane.airline == airline)
            .collect(),
        None => planes,
    };

    Json(filtered)
}

async fn get_plane(
    State(state): State<Arc<AppState>>,
    Path(plane_id): Path<String>,
) -> Result<Json<Plane>, StatusCode> {
    state.get_plane(&plane_id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "planes": state.plane_count(),
        "airports": state.catalog().airport_count(),
        "gates": state.catalog().gate_count(),
        "runways": state.catalog().runway_count(),
    }))
}
