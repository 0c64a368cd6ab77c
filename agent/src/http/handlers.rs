//! Route handlers. Each one delegates to an application service and maps
//! the result onto the JSON shapes in `wakehost_common`.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wakehost_common::{
    ActionResponse, HealthResponse, KeepAliveStatusResponse, KillAllResponse, KillRequest,
    SshListResponse, timestamp_millis,
};

use crate::domain::RequestError;
use crate::http::AppState;
use crate::http::error::ApiError;

fn status_for(success: bool) -> StatusCode {
    if success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

fn action(result: ActionResponse) -> Response {
    (status_for(result.success), Json(result)).into_response()
}

/// `GET /api/ssh`
pub async fn list_connections(State(state): State<Arc<AppState>>) -> Json<SshListResponse> {
    let connections = state.inspector.list_established().await;
    Json(SshListResponse {
        success: true,
        hostname: state.hostname.clone(),
        timestamp: timestamp_millis(),
        connections,
    })
}

/// `POST /api/ssh/kill`
///
/// The body is read in full and parsed here rather than through `Json` so
/// that malformed input maps onto the agent's own 400 body.
pub async fn kill_connection(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: KillRequest =
        serde_json::from_slice(&body).map_err(|_| RequestError::InvalidJson)?;
    let result = state
        .terminator
        .kill_one(request.remote_address.as_deref(), request.remote_port)
        .await?;
    Ok(action(result))
}

/// `POST /api/ssh/kill-all`
pub async fn kill_all_connections(State(state): State<Arc<AppState>>) -> Response {
    let result: KillAllResponse = state.terminator.kill_all().await;
    (status_for(result.success), Json(result)).into_response()
}

/// `GET /api/keep-alive`
pub async fn keep_alive_status(State(state): State<Arc<AppState>>) -> Json<KeepAliveStatusResponse> {
    let status = state.keep_alive.status();
    let (last_exit_code, last_exit_signal) = status
        .last_exit
        .map(|exit| (exit.code, exit.signal))
        .unwrap_or_default();
    Json(KeepAliveStatusResponse {
        success: true,
        active: status.active,
        pid: status.pid,
        last_exit_code,
        last_exit_signal,
    })
}

/// `POST /api/keep-alive/start`
pub async fn start_keep_alive(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let pid = state.keep_alive.start()?;
    Ok(action(ActionResponse {
        success: true,
        message: format!("Keep-alive started (PID {pid})"),
    }))
}

/// `POST /api/keep-alive/stop`
pub async fn stop_keep_alive(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state.keep_alive.stop()?;
    Ok(action(ActionResponse {
        success: true,
        message: "Keep-alive stopped".to_string(),
    }))
}

/// `POST /api/suspend`
pub async fn suspend(State(state): State<Arc<AppState>>) -> Response {
    action(state.power.suspend().await)
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        hostname: state.hostname.clone(),
        timestamp: timestamp_millis(),
    })
}

/// Unknown path or method.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
