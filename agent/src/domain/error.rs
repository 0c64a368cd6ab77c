//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error`. Their `Display` text is the
//! message returned to API callers, so keep it user-facing.

use thiserror::Error;

// ── Request errors ────────────────────────────────────────────────────────────

/// A mutating request carried a body that cannot be acted on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing remoteAddress or remotePort")]
    MissingParameter,

    #[error("Invalid remoteAddress: {0}")]
    InvalidAddress(String),

    #[error("Invalid JSON body")]
    InvalidJson,
}

// ── Keep-alive errors ─────────────────────────────────────────────────────────

/// Keep-alive transitions that were refused or could not be carried out.
///
/// The state conflicts leave the session untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeepAliveError {
    #[error("Keep-alive is already running")]
    AlreadyRunning,

    #[error("Keep-alive is not running")]
    NotRunning,

    #[error("Failed to start keep-alive: {0}")]
    Launch(String),
}
