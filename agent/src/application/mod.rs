//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`
//! or `crate::http`.

pub mod ports;
pub mod services;

pub use ports::CommandRunner;
pub use services::{ConnectionInspector, ConnectionTerminator, KeepAliveManager, PowerController};
