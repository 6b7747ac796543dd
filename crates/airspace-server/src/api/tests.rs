use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use airspace_core::{Airline, Airport, Gate, Plane, Runway, SizeClass, ViolationKind};

use crate::alerts::{alert_channel, AlertQueue};
use crate::{api, config::Config, state::AppState};

fn setup_app() -> (axum::Router, Arc<AppState>, AlertQueue) {
    let (alerts, queue) = alert_channel(64);
    let state = Arc::new(AppState::new(Config::default(), alerts));

    let catalog = state.catalog();
    catalog.insert_airline(Airline::new("acme"));
    catalog.insert_airline(Airline::new("zenith"));
    catalog.insert_airport(Airport::new("kkz", 0.0, 0.0)).unwrap();
    catalog.insert_airport(Airport::new("xhz", 30.0, 40.0)).unwrap();
    catalog.link_airline("kkz", "acme").unwrap();
    catalog.link_airline("xhz", "acme").unwrap();
    catalog.link_airline("kkz", "zenith").unwrap();
    catalog
        .insert_gate(Gate::new("jemhnkkldw", SizeClass::Large, "kkz"))
        .unwrap();
    catalog
        .insert_runway(Runway::new("iagriywrss", SizeClass::Small, "kkz"))
        .unwrap();

    state.insert_plane(Plane::new("gnfasudtlm", SizeClass::Small, "acme", 200));
    state.insert_plane(Plane::new("matxovlzow", SizeClass::Small, "zenith", 200));

    let app = api::routes().with_state(state.clone());
    (app, state, queue)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn heading_update_is_acknowledged_and_applied() {
    let (app, state, mut queue) = setup_app();

    let res = app
        .clone()
        .oneshot(post_json(
            "/api/headings",
            json!({
                "plane": "gnfasudtlm",
                "direction": 36.87,
                "speed": 600.0,
                "origin": "kkz",
                "destination": "xhz",
                "take_off_time": "2023-01-01 10:00",
                "landing_time": "2023-01-01 10:05"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await, json!({}));
    let plane = state.get_plane("gnfasudtlm").unwrap();
    assert_eq!(plane.origin.as_deref(), Some("kkz"));
    assert_eq!(plane.destination.as_deref(), Some("xhz"));
    assert_eq!(plane.speed, 600.0);
    assert!(queue.drain().is_empty());
}

#[tokio::test]
async fn unknown_plane_is_not_found() {
    let (app, _state, mut queue) = setup_app();

    let res = app
        .oneshot(post_json(
            "/api/counts",
            json!({ "plane": "nosuchplane", "passenger_count": 5 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = read_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("nosuchplane"));
    assert!(queue.drain().is_empty());
}

#[tokio::test]
async fn unknown_airport_leaves_plane_untouched() {
    let (app, state, _queue) = setup_app();

    let res = app
        .oneshot(post_json(
            "/api/headings",
            json!({
                "plane": "gnfasudtlm",
                "direction": 90.0,
                "speed": 100.0,
                "origin": "kkz",
                "destination": "nowhere",
                "take_off_time": "2023-01-01 10:00",
                "landing_time": "2023-01-01 11:00"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let plane = state.get_plane("gnfasudtlm").unwrap();
    assert!(plane.origin.is_none());
    assert!(plane.destination.is_none());
}

#[tokio::test]
async fn malformed_payload_is_rejected() {
    let (app, _state, _queue) = setup_app();

    let res = app
        .oneshot(post_json(
            "/api/gates",
            json!({ "plane": "gnfasudtlm", "gate": "jemhnkkldw", "arrive_at_time": "yesterday" }),
        ))
        .await
        .unwrap();

    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn violations_do_not_change_the_response() {
    let (app, state, mut queue) = setup_app();

    let res = app
        .oneshot(post_json(
            "/api/counts",
            json!({ "plane": "gnfasudtlm", "passenger_count": 500 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        state.get_plane("gnfasudtlm").unwrap().current_passenger_count,
        500
    );
    let queued = queue.drain();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].kind, ViolationKind::TooManyPassengers);
    assert_eq!(queued[0].subject_id, "gnfasudtlm");
}

#[tokio::test]
async fn gate_and_runway_updates_round_trip_through_state() {
    let (app, state, _queue) = setup_app();

    let res = app
        .clone()
        .oneshot(post_json(
            "/api/gates",
            json!({ "plane": "gnfasudtlm", "gate": "jemhnkkldw", "arrive_at_time": "2023-01-01 09:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        state.get_plane("gnfasudtlm").unwrap().gate.as_deref(),
        Some("jemhnkkldw")
    );

    let res = app
        .clone()
        .oneshot(post_json(
            "/api/runways",
            json!({ "plane": "gnfasudtlm", "runway": "iagriywrss", "arrive_at_time": "2023-01-01 09:30" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        state.get_plane("gnfasudtlm").unwrap().runway.as_deref(),
        Some("iagriywrss")
    );

    let res = app
        .oneshot(post_json(
            "/api/gates",
            json!({ "plane": "gnfasudtlm", "gate": "jemhnkkldw" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let plane = state.get_plane("gnfasudtlm").unwrap();
    assert!(plane.gate.is_none());
    assert!(plane.runway.is_none());
}

#[tokio::test]
async fn list_planes_filters_by_airline() {
    let (app, _state, _queue) = setup_app();

    let res = app.clone().oneshot(get("/v1/planes")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await.as_array().unwrap().len(), 2);

    let res = app.oneshot(get("/v1/planes?airline=zenith")).await.unwrap();
    let body = read_json(res).await;
    let planes = body.as_array().unwrap();
    assert_eq!(planes.len(), 1);
    assert_eq!(planes[0]["identifier"], "matxovlzow");
}

#[tokio::test]
async fn get_plane_returns_state_or_404() {
    let (app, _state, _queue) = setup_app();

    let res = app.clone().oneshot(get("/v1/planes/gnfasudtlm")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["size"], "SMALL");
    assert_eq!(body["max_passenger_count"], 200);

    let res = app.oneshot(get("/v1/planes/missing")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_counts() {
    let (app, _state, _queue) = setup_app();

    let res = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["planes"], 2);
    assert_eq!(body["airports"], 2);
}
