//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution and host
//! facts. Imports from `crate::domain` and `crate::application::ports` are
//! allowed. Imports from `crate::http` are forbidden.

pub mod command_runner;
pub mod host;

pub use command_runner::TokioCommandRunner;
