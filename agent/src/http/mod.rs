//! HTTP API — axum router, middleware and handlers.
//!
//! Every route except CORS preflight requires `Authorization: Bearer
//! <secret>`, including `/health`. Layer order, outermost first:
//! CORS → trace → panic catcher → bearer auth → routes.

pub mod auth;
pub mod cors;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use wakehost_common::AgentConfig;

use crate::application::{
    CommandRunner, ConnectionInspector, ConnectionTerminator, KeepAliveManager, PowerController,
};
use crate::domain::KeepAliveSettings;

pub use auth::SharedSecret;
pub use error::ApiError;

/// Routes served by the agent, for the startup banner.
pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/api/ssh", "Get SSH connection states"),
    ("POST", "/api/ssh/kill", "Kill specific SSH connection"),
    ("POST", "/api/ssh/kill-all", "Kill all SSH connections"),
    ("GET", "/api/keep-alive", "Get keep-alive status"),
    ("POST", "/api/keep-alive/start", "Start keep-alive"),
    ("POST", "/api/keep-alive/stop", "Stop keep-alive"),
    ("POST", "/api/suspend", "Suspend the system"),
    ("GET", "/health", "Health check"),
];

/// Everything a request handler can reach.
pub struct AppState {
    pub inspector: ConnectionInspector,
    pub terminator: ConnectionTerminator,
    pub power: PowerController,
    pub keep_alive: KeepAliveManager,
    pub secret: SharedSecret,
    /// Captured once at startup; `/health` reports this value.
    pub hostname: String,
}

impl AppState {
    /// Wire every service to one command runner.
    #[must_use]
    pub fn new(config: &AgentConfig, runner: Arc<dyn CommandRunner>, hostname: String) -> Self {
        let inspector = ConnectionInspector::new(Arc::clone(&runner), config.ssh_port);
        let terminator = ConnectionTerminator::new(Arc::clone(&runner), inspector.clone());
        let power = PowerController::new(Arc::clone(&runner));
        let keep_alive = KeepAliveManager::new(
            runner,
            KeepAliveSettings {
                host: config.keep_alive_host.clone(),
                interval_secs: config.keep_alive_interval_secs,
            },
        );
        Self {
            inspector,
            terminator,
            power,
            keep_alive,
            secret: SharedSecret::new(config.api_secret.clone()),
            hostname,
        }
    }
}

/// Build the agent's router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ssh", get(handlers::list_connections))
        .route("/api/ssh/kill", post(handlers::kill_connection))
        .route("/api/ssh/kill-all", post(handlers::kill_all_connections))
        .route("/api/keep-alive", get(handlers::keep_alive_status))
        .route("/api/keep-alive/start", post(handlers::start_keep_alive))
        .route("/api/keep-alive/stop", post(handlers::stop_keep_alive))
        .route("/api/suspend", post(handlers::suspend))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_bearer,
        ))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors::cors))
        .with_state(state)
}
