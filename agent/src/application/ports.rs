//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::CommandOutcome;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Arguments are always passed as a structured argv; implementations must
/// never hand them to a shell.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program to completion and fold everything that can go wrong
    /// (spawn error, non-zero exit, timeout) into the returned outcome.
    ///
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run(&self, program: &str, args: &[&str]) -> CommandOutcome;

    /// Spawn a long-lived program without waiting for it to finish.
    ///
    /// The child must be killed if its handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child>;
}
