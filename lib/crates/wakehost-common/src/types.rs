use chrono::Utc;
use serde::{Deserialize, Serialize};

/// State label reported for every inspected connection.
pub const ESTABLISHED: &str = "ESTABLISHED";

/// One established TCP connection on the inspected service port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshConnection {
    pub state: String,
    pub local_address: String,
    pub local_port: u16,
    pub remote_address: String,
    pub remote_port: u16,
}

/// Body of `POST /api/ssh/kill`.
///
/// Both fields are optional at the wire level so that a missing field is
/// reported as a validation failure rather than a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillRequest {
    #[serde(default)]
    pub remote_address: Option<String>,
    #[serde(default)]
    pub remote_port: Option<u16>,
}

/// `GET /api/ssh` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshListResponse {
    pub success: bool,
    pub hostname: String,
    pub timestamp: i64,
    pub connections: Vec<SshConnection>,
}

/// Generic `{success, message}` result of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /api/ssh/kill-all` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillAllResponse {
    pub success: bool,
    pub message: String,
    pub killed: usize,
}

/// `GET /api/keep-alive` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepAliveStatusResponse {
    pub success: bool,
    pub active: bool,
    /// Always serialized, `null` when idle.
    pub pid: Option<u32>,
    /// Exit code of the most recent session, if it exited normally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exit_code: Option<i32>,
    /// Terminating signal of the most recent session, e.g. `"SIGTERM"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exit_signal: Option<String>,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub hostname: String,
    pub timestamp: i64,
}

/// Body of every 401/404/500 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Current time as Unix epoch milliseconds.
#[must_use]
pub fn timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}
