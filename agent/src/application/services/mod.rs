//! Application services — one per controllable host facility.

pub mod inspector;
pub mod keep_alive;
pub mod power;
pub mod terminator;

pub use inspector::ConnectionInspector;
pub use keep_alive::{KeepAliveManager, KeepAliveStatus};
pub use power::PowerController;
pub use terminator::ConnectionTerminator;
