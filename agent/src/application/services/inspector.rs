//! Application service — established-connection inspection use-case.

use std::sync::Arc;

use wakehost_common::SshConnection;

use crate::application::ports::CommandRunner;
use crate::domain::parse_connections;

pub const SS_PROGRAM: &str = "ss";

/// `ss` filter selecting connections whose local port is `port`.
#[must_use]
pub fn source_port_filter(port: u16) -> String {
    format!("( sport = :{port} )")
}

/// Lists established inbound connections on one service port.
#[derive(Clone)]
pub struct ConnectionInspector {
    runner: Arc<dyn CommandRunner>,
    port: u16,
}

impl ConnectionInspector {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, port: u16) -> Self {
        Self { runner, port }
    }

    /// The service port being inspected.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Currently established connections on the service port.
    ///
    /// This function is infallible — a failing `ss` is logged and reported
    /// as no connections, so status polling keeps working.
    pub async fn list_established(&self) -> Vec<SshConnection> {
        let filter = source_port_filter(self.port);
        let outcome = self
            .runner
            .run(
                SS_PROGRAM,
                &["-H", "-t", "-n", "state", "established", filter.as_str()],
            )
            .await;

        if !outcome.succeeded {
            tracing::warn!(
                port = self.port,
                error = %outcome.diagnostic(),
                "failed to list established connections",
            );
            return Vec::new();
        }

        parse_connections(&outcome.combined_output)
    }
}
