//! wakehost agent entry point.
//!
//! Initialises tracing, loads configuration from `AGENT_*` environment
//! variables, and serves the host-control HTTP API until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;
use wakehost_common::{AgentConfig, ENV_PREFIX};

use wakehost_agent::http::{self, AppState, ENDPOINTS};
use wakehost_agent::infra::{TokioCommandRunner, host};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load configuration from AGENT_* env vars.
    let config: AgentConfig = envy::prefixed(ENV_PREFIX)
        .from_env()
        .context("failed to load config from AGENT_* env vars (AGENT_API_SECRET is required)")?;
    config.validate().context("invalid configuration")?;

    let hostname = host::hostname();
    let endpoints: Vec<String> = ENDPOINTS
        .iter()
        .map(|(method, path, what)| format!("{method:<4} {path:<22} {what}"))
        .collect();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        host = %hostname,
        ssh_port = config.ssh_port,
        endpoints = ?endpoints,
        "wakehost agent starting",
    );

    // 3. Wire services onto the real process runner.
    let runner = Arc::new(TokioCommandRunner::new(Duration::from_secs(
        config.command_timeout_secs,
    )));
    let state = Arc::new(AppState::new(&config, runner, hostname));
    let router = http::router(Arc::clone(&state));

    // 4. Bind and serve.
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind TCP listener on {addr}"))?;
    tracing::info!("agent API listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // The watcher task is dropped with the runtime; kill-on-drop is the
    // backstop if SIGTERM has not landed by then.
    if let Ok(pid) = state.keep_alive.stop() {
        tracing::info!(pid, "stopped keep-alive on shutdown");
    }

    tracing::info!("wakehost agent shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("received shutdown signal");
}
