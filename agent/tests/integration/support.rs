//! Shared helpers: a runner that scripts one-shot commands but spawns real
//! processes, and request/response plumbing for the router.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wakehost_agent::application::CommandRunner;
use wakehost_agent::domain::CommandOutcome;
use wakehost_agent::http::{self, AppState};
use wakehost_common::{AgentConfig, ENV_PREFIX};

pub const SECRET: &str = "test-secret";

// ── Runner ────────────────────────────────────────────────────────────────────

/// Answers `run` from a script; `spawn` launches `spawn_cmd` for real,
/// whatever program was asked for, and records what was asked.
pub struct TestRunner {
    outcomes: Mutex<VecDeque<CommandOutcome>>,
    calls: Mutex<Vec<Vec<String>>>,
    spawned: Mutex<Vec<Vec<String>>>,
    spawn_cmd: Vec<String>,
}

impl TestRunner {
    pub fn scripted(outcomes: Vec<CommandOutcome>) -> Arc<Self> {
        Self::build(outcomes, &["sleep", "30"])
    }

    /// Runner whose spawned children run `cmd` instead of ssh.
    pub fn spawning(cmd: &[&str]) -> Arc<Self> {
        Self::build(Vec::new(), cmd)
    }

    fn build(outcomes: Vec<CommandOutcome>, cmd: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
            spawned: Mutex::new(Vec::new()),
            spawn_cmd: cmd.iter().map(ToString::to_string).collect(),
        })
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn spawned(&self) -> Vec<Vec<String>> {
        self.spawned.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for TestRunner {
    async fn run(&self, program: &str, args: &[&str]) -> CommandOutcome {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(ToString::to_string));
        self.calls.lock().unwrap().push(call);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CommandOutcome::failure("", "not expected in this test"))
    }

    fn spawn(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(ToString::to_string));
        self.spawned.lock().unwrap().push(call);

        let (cmd, cmd_args) = self.spawn_cmd.split_first().context("empty spawn command")?;
        tokio::process::Command::new(cmd)
            .args(cmd_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {cmd}"))
    }
}

/// Panics on every call, to exercise the router's panic handling.
pub struct PanickingRunner;

pub const PANIC_DETAIL: &str = "runner exploded: secret detail";

#[async_trait]
impl CommandRunner for PanickingRunner {
    async fn run(&self, _program: &str, _args: &[&str]) -> CommandOutcome {
        panic!("{PANIC_DETAIL}");
    }

    fn spawn(&self, _program: &str, _args: &[&str]) -> Result<tokio::process::Child> {
        panic!("{PANIC_DETAIL}");
    }
}

// ── App construction ──────────────────────────────────────────────────────────

pub fn config() -> AgentConfig {
    envy::prefixed(ENV_PREFIX)
        .from_iter(vec![("AGENT_API_SECRET".to_string(), SECRET.to_string())])
        .unwrap()
}

pub fn state(runner: Arc<TestRunner>) -> Arc<AppState> {
    Arc::new(AppState::new(&config(), runner, "test-host".to_string()))
}

pub fn app(runner: Arc<TestRunner>) -> Router {
    http::router(state(runner))
}

/// Router over an arbitrary runner.
pub fn app_with(runner: Arc<dyn CommandRunner>) -> Router {
    http::router(Arc::new(AppState::new(
        &config(),
        runner,
        "test-host".to_string(),
    )))
}

// ── Requests ──────────────────────────────────────────────────────────────────

pub fn get(path: &str) -> Request<Body> {
    Request::get(path)
        .header("authorization", format!("Bearer {SECRET}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post(path: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header("authorization", format!("Bearer {SECRET}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn unauthenticated(method: &str, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Poll `check` until it holds or `timeout` elapses.
pub async fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
