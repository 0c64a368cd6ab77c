pub mod config;
pub mod types;

pub use config::{AgentConfig, ConfigError, ENV_PREFIX};
pub use types::*;
