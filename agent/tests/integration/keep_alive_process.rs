//! Keep-alive lifecycle against real child processes.

use std::time::Duration;

use axum::http::StatusCode;
use wakehost_agent::application::KeepAliveManager;
use wakehost_agent::domain::{KeepAliveError, KeepAliveSettings};

use crate::support::{TestRunner, app, eventually, get, json, post, send};

const SETTLE: Duration = Duration::from_secs(5);

fn manager(runner: std::sync::Arc<TestRunner>) -> KeepAliveManager {
    KeepAliveManager::new(
        runner,
        KeepAliveSettings {
            host: "localhost".to_string(),
            interval_secs: 30,
        },
    )
}

#[tokio::test]
async fn start_spawns_ssh_with_keep_alive_options() {
    let runner = TestRunner::spawning(&["sleep", "30"]);
    let keep_alive = manager(runner.clone());

    let pid = keep_alive.start().unwrap();

    let status = keep_alive.status();
    assert!(status.active);
    assert_eq!(status.pid, Some(pid));
    assert_eq!(
        runner.spawned(),
        vec![vec![
            "ssh",
            "-N",
            "-o",
            "ServerAliveInterval=30",
            "-o",
            "BatchMode=yes",
            "-o",
            "StrictHostKeyChecking=no",
            "localhost",
        ]]
    );

    keep_alive.stop().unwrap();
}

#[tokio::test]
async fn second_start_is_rejected_and_keeps_first_session() {
    let runner = TestRunner::spawning(&["sleep", "30"]);
    let keep_alive = manager(runner.clone());

    let pid = keep_alive.start().unwrap();
    assert_eq!(keep_alive.start(), Err(KeepAliveError::AlreadyRunning));

    assert_eq!(keep_alive.status().pid, Some(pid));
    assert_eq!(runner.spawned().len(), 1, "only one child may be spawned");

    keep_alive.stop().unwrap();
}

#[tokio::test]
async fn stop_clears_immediately_and_terminates_child() {
    let keep_alive = manager(TestRunner::spawning(&["sleep", "30"]));

    let pid = keep_alive.start().unwrap();
    assert_eq!(keep_alive.stop(), Ok(pid));

    let status = keep_alive.status();
    assert!(!status.active);
    assert!(status.pid.is_none());

    assert!(
        eventually(SETTLE, || {
            keep_alive
                .status()
                .last_exit
                .is_some_and(|exit| exit.signal.as_deref() == Some("SIGTERM"))
        })
        .await,
        "child should exit on SIGTERM"
    );
}

#[tokio::test]
async fn stop_when_idle_is_rejected() {
    let keep_alive = manager(TestRunner::spawning(&["sleep", "30"]));

    assert_eq!(keep_alive.stop(), Err(KeepAliveError::NotRunning));
    assert!(!keep_alive.status().active);
}

#[tokio::test]
async fn child_exiting_on_its_own_returns_to_idle() {
    let keep_alive = manager(TestRunner::spawning(&["sh", "-c", "exit 3"]));

    keep_alive.start().unwrap();

    assert!(
        eventually(SETTLE, || !keep_alive.status().active).await,
        "exit observer should clear the session"
    );
    let last_exit = keep_alive.status().last_exit.unwrap();
    assert_eq!(last_exit.code, Some(3));
    assert!(last_exit.signal.is_none());
    assert_eq!(keep_alive.stop(), Err(KeepAliveError::NotRunning));
}

#[tokio::test]
async fn can_restart_after_stop() {
    let keep_alive = manager(TestRunner::spawning(&["sleep", "30"]));

    let first = keep_alive.start().unwrap();
    keep_alive.stop().unwrap();
    let second = keep_alive.start().unwrap();

    assert_ne!(first, second);
    // The first session's late exit must not clear the second one.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(keep_alive.status().pid, Some(second));

    keep_alive.stop().unwrap();
}

#[tokio::test]
async fn http_start_status_stop_round_trip() {
    let app = app(TestRunner::spawning(&["sleep", "30"]));

    let response = send(&app, post("/api/keep-alive/start", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let started = json(response).await;
    assert_eq!(started["success"], true);
    assert!(
        started["message"]
            .as_str()
            .unwrap()
            .starts_with("Keep-alive started (PID ")
    );

    let status = json(send(&app, get("/api/keep-alive")).await).await;
    assert_eq!(status["active"], true);
    assert!(status["pid"].as_u64().is_some());

    let again = send(&app, post("/api/keep-alive/start", "")).await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(again).await["message"], "Keep-alive is already running");

    let stopped = send(&app, post("/api/keep-alive/stop", "")).await;
    assert_eq!(stopped.status(), StatusCode::OK);
    assert_eq!(
        json(stopped).await,
        serde_json::json!({"success": true, "message": "Keep-alive stopped"})
    );

    let status = json(send(&app, get("/api/keep-alive")).await).await;
    assert_eq!(status["active"], false);
    assert!(status["pid"].is_null());
}
