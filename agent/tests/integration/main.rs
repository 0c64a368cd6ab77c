//! Integration tests for the wakehost agent
//!
//! These tests drive the full axum router in-process and spawn real
//! short-lived child processes for the keep-alive lifecycle.

mod keep_alive_process;
mod support;
