use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Environment variable prefix for every agent setting.
pub const ENV_PREFIX: &str = "AGENT_";

/// Agent configuration, deserialized from `AGENT_*` environment variables.
///
///   - `AGENT_PORT`                     (default `3001`)
///   - `AGENT_BIND_ADDR`                (default `0.0.0.0`)
///   - `AGENT_API_SECRET`               (required, non-empty)
///   - `AGENT_SSH_PORT`                 (default `22`)
///   - `AGENT_KEEP_ALIVE_HOST`          (default `localhost`)
///   - `AGENT_KEEP_ALIVE_INTERVAL_SECS` (default `30`)
///   - `AGENT_COMMAND_TIMEOUT_SECS`     (default `30`)
#[derive(Clone, Deserialize)]
pub struct AgentConfig {
    /// TCP port the HTTP API binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: IpAddr,

    /// Shared bearer secret. Never logged.
    pub api_secret: String,

    /// Service port whose established connections are inspected and killed.
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Destination of the keep-alive SSH link.
    #[serde(default = "default_keep_alive_host")]
    pub keep_alive_host: String,

    /// `ServerAliveInterval` for the keep-alive link, in seconds.
    #[serde(default = "default_keep_alive_interval_secs")]
    pub keep_alive_interval_secs: u64,

    /// Upper bound on one-shot OS commands, in seconds.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

/// Configuration rejected at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AGENT_API_SECRET must not be empty")]
    EmptySecret,

    #[error("AGENT_COMMAND_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,

    #[error("AGENT_KEEP_ALIVE_HOST must not be empty")]
    EmptyKeepAliveHost,
}

impl AgentConfig {
    /// Reject values that deserialize fine but cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.keep_alive_host.trim().is_empty() {
            return Err(ConfigError::EmptyKeepAliveHost);
        }
        Ok(())
    }

    /// Socket address the HTTP API listens on.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("api_secret", &"<redacted>")
            .field("ssh_port", &self.ssh_port)
            .field("keep_alive_host", &self.keep_alive_host)
            .field("keep_alive_interval_secs", &self.keep_alive_interval_secs)
            .field("command_timeout_secs", &self.command_timeout_secs)
            .finish()
    }
}

fn default_port() -> u16 {
    3001
}

fn default_bind_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_ssh_port() -> u16 {
    22
}

fn default_keep_alive_host() -> String {
    "localhost".to_string()
}

fn default_keep_alive_interval_secs() -> u64 {
    30
}

fn default_command_timeout_secs() -> u64 {
    30
}
