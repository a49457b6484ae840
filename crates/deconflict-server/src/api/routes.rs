//! REST API routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use deconflict_core::{Mission, MissionRequest, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::{AppState, CheckRecord, RegisteredTraffic};

type ApiError = (StatusCode, Json<Value>);

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/config", get(get_config))
        .route("/v1/traffic", get(list_traffic).post(register_traffic))
        .route("/v1/missions/check", post(check_mission))
        .route("/v1/checks", get(list_checks))
        .route("/v1/checks/:check_id", get(get_check))
}

// === Request/Response types ===

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub mission: MissionRequest,
    /// Falls back to the server's default step when omitted
    #[serde(default)]
    pub time_step: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub safety_radius: f64,
    pub default_time_step: f64,
    pub max_samples_per_check: usize,
}

fn validation_error(err: ValidationError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": err.to_string() })),
    )
}

// === Handlers ===

async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let config = state.config();
    Json(ConfigResponse {
        safety_radius: config.safety_radius_m,
        default_time_step: config.default_time_step_s,
        max_samples_per_check: config.max_samples_per_check,
    })
}

async fn register_traffic(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MissionRequest>,
) -> Result<(StatusCode, Json<RegisteredTraffic>), ApiError> {
    let registered = state.register_traffic(payload).map_err(|err| {
        tracing::debug!("Rejected traffic registration: {}", err);
        validation_error(err)
    })?;
    Ok((StatusCode::CREATED, Json(registered)))
}

async fn list_traffic(State(state): State<Arc<AppState>>) -> Json<Vec<Mission>> {
    Json(state.traffic())
}

async fn check_mission(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckRequest>,
) -> Result<Json<CheckRecord>, ApiError> {
    // Long windows with small steps are CPU-bound; keep them off the reactor.
    let worker_state = state.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        worker_state.check_mission(payload.mission, payload.time_step)
    })
    .await
    .map_err(|err| {
        tracing::error!("Mission check task failed: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "mission check failed" })),
        )
    })?;

    outcome.map(Json).map_err(validation_error)
}

async fn list_checks(State(state): State<Arc<AppState>>) -> Json<Vec<CheckRecord>> {
    Json(state.list_checks())
}

async fn get_check(
    State(state): State<Arc<AppState>>,
    Path(check_id): Path<String>,
) -> Result<Json<CheckRecord>, ApiError> {
    state.get_check(&check_id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("check {} not found", check_id) })),
        )
    })
}
