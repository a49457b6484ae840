use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

fn setup_app() -> (axum::Router<Arc<AppState>>, Arc<AppState>) {
    let config = Config {
        safety_radius_m: 10.0,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config).expect("valid config"));
    (api::routes(), state)
}

async fn send(
    app: &axum::Router<Arc<AppState>>,
    state: &Arc<AppState>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app
        .clone()
        .with_state(state.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse json")
    };
    (status, value)
}

fn north_south_traffic() -> Value {
    json!({
        "id": "Traffic_01",
        "waypoints": [{"x": 50.0, "y": 100.0, "z": 20.0}, {"x": 50.0, "y": 0.0, "z": 20.0}],
        "t_start": 0.0,
        "t_end": 20.0
    })
}

fn west_east_primary(z: f64) -> Value {
    json!({
        "id": "Primary_Alpha",
        "waypoints": [{"x": 0.0, "y": 50.0, "z": z}, {"x": 100.0, "y": 50.0, "z": z}],
        "t_start": 0.0,
        "t_end": 20.0
    })
}

#[tokio::test]
async fn register_and_list_traffic() {
    let (app, state) = setup_app();

    let (status, body) = send(&app, &state, "POST", "/v1/traffic", Some(north_south_traffic())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mission_id"], "Traffic_01");
    assert_eq!(body["traffic_count"], 1);

    let (status, body) = send(&app, &state, "GET", "/v1/traffic", None).await;
    assert_eq!(status, StatusCode::OK);
    let traffic = body.as_array().expect("traffic list");
    assert_eq!(traffic.len(), 1);
    assert_eq!(traffic[0]["id"], "Traffic_01");
    let points = traffic[0]["trajectory"]["points"].as_array().expect("built trajectory");
    assert_eq!(points.len(), 2);
    assert_eq!(points[1]["t"], 20.0);
}

#[tokio::test]
async fn malformed_traffic_is_rejected() {
    let (app, state) = setup_app();

    let (status, body) = send(
        &app,
        &state,
        "POST",
        "/v1/traffic",
        Some(json!({
            "id": "Backwards",
            "waypoints": [{"x": 0.0, "y": 0.0, "z": 0.0}],
            "t_start": 10.0,
            "t_end": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("time window"));

    let (status, body) = send(
        &app,
        &state,
        "POST",
        "/v1/traffic",
        Some(json!({ "id": "Empty", "waypoints": [], "t_start": 0.0, "t_end": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("waypoint"));
    assert_eq!(state.traffic_count(), 0);
}

#[tokio::test]
async fn check_detects_crossing_conflict() {
    let (app, state) = setup_app();
    send(&app, &state, "POST", "/v1/traffic", Some(north_south_traffic())).await;

    let (status, body) = send(
        &app,
        &state,
        "POST",
        "/v1/missions/check",
        Some(json!({ "mission": west_east_primary(20.0), "time_step": 0.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mission_id"], "Primary_Alpha");
    assert_eq!(body["result"]["status"], "CONFLICT_DETECTED");

    let details = body["result"]["details"].as_array().unwrap();
    let crossing = details
        .iter()
        .find(|d| d["time"] == 10.0)
        .expect("conflict at t=10");
    assert_eq!(crossing["conflicting_drone_id"], "Traffic_01");
    assert_eq!(crossing["distance"], 0.0);
    assert_eq!(crossing["location"], json!([50.0, 50.0, 20.0]));

    let check_id = body["check_id"].as_str().unwrap().to_string();
    let (status, stored) = send(&app, &state, "GET", &format!("/v1/checks/{}", check_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["result"], body["result"]);
}

#[tokio::test]
async fn check_clear_by_altitude_uses_default_step() {
    let (app, state) = setup_app();
    send(
        &app,
        &state,
        "POST",
        "/v1/traffic",
        Some(json!({
            "id": "Traffic_02",
            "waypoints": [{"x": 50.0, "y": 100.0, "z": 50.0}, {"x": 50.0, "y": 0.0, "z": 50.0}],
            "t_start": 0.0,
            "t_end": 20.0
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        &state,
        "POST",
        "/v1/missions/check",
        Some(json!({ "mission": west_east_primary(10.0) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["time_step"], 0.5);
    assert_eq!(body["result"]["status"], "CLEAR");
    assert_eq!(body["result"]["details"], json!([]));
}

#[tokio::test]
async fn invalid_time_step_is_rejected() {
    let (app, state) = setup_app();
    let (status, body) = send(
        &app,
        &state,
        "POST",
        "/v1/missions/check",
        Some(json!({ "mission": west_east_primary(20.0), "time_step": -1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("time step"));

    let (_, checks) = send(&app, &state, "GET", "/v1/checks", None).await;
    assert_eq!(checks, json!([]));
}

#[tokio::test]
async fn tiny_time_step_exceeds_sample_budget() {
    let (app, state) = setup_app();
    let (status, body) = send(
        &app,
        &state,
        "POST",
        "/v1/missions/check",
        Some(json!({ "mission": west_east_primary(20.0), "time_step": 1e-12 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("limit is 200000"));

    let (_, checks) = send(&app, &state, "GET", "/v1/checks", None).await;
    assert_eq!(checks, json!([]));
}

#[tokio::test]
async fn unknown_check_is_not_found() {
    let (app, state) = setup_app();
    let (status, body) = send(&app, &state, "GET", "/v1/checks/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn config_reports_engine_settings() {
    let (app, state) = setup_app();
    let (status, body) = send(&app, &state, "GET", "/v1/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["safety_radius"], 10.0);
    assert_eq!(body["default_time_step"], 0.5);
}
