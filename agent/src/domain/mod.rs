//! Domain layer — pure parsing, validation and classification logic.
//!
//! This module has zero imports from `crate::infra`, `crate::http`,
//! `crate::application`, `tokio`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod command;
pub mod connection;
pub mod error;
pub mod keep_alive;
pub mod power;

pub use command::CommandOutcome;
pub use connection::{KillTarget, parse_address, parse_connections, validate_kill_target};
pub use error::{KeepAliveError, RequestError};
pub use keep_alive::{ExitRecord, KeepAliveSettings};
pub use power::{INHIBITOR_MARKER, SuspendOutcome, classify_suspend};
