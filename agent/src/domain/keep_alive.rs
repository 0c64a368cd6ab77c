//! Keep-alive link parameters and exit bookkeeping.

use nix::sys::signal::Signal;

/// Program used for the keep-alive link.
pub const SSH_PROGRAM: &str = "ssh";

/// How the keep-alive SSH link is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveSettings {
    /// `[user@]host` to connect to.
    pub host: String,
    /// `ServerAliveInterval` in seconds.
    pub interval_secs: u64,
}

impl KeepAliveSettings {
    /// Arguments for a link that runs no remote command, probes liveness
    /// periodically, never prompts and skips host-key verification.
    #[must_use]
    pub fn ssh_args(&self) -> Vec<String> {
        vec![
            "-N".to_string(),
            "-o".to_string(),
            format!("ServerAliveInterval={}", self.interval_secs),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            self.host.clone(),
        ]
    }
}

/// How the most recent keep-alive process ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitRecord {
    pub code: Option<i32>,
    /// Signal name such as `SIGTERM`, or `signal <n>` when unknown.
    pub signal: Option<String>,
}

impl ExitRecord {
    #[must_use]
    pub fn new(code: Option<i32>, signal: Option<i32>) -> Self {
        Self {
            code,
            signal: signal.map(signal_name),
        }
    }
}

fn signal_name(signal: i32) -> String {
    Signal::try_from(signal).map_or_else(|_| format!("signal {signal}"), |s| s.as_str().to_string())
}
