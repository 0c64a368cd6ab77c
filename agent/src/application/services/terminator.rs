//! Application service — connection termination use-case.

use std::sync::Arc;

use wakehost_common::{ActionResponse, KillAllResponse};

use crate::application::ports::CommandRunner;
use crate::application::services::inspector::{
    ConnectionInspector, SS_PROGRAM, source_port_filter,
};
use crate::domain::{RequestError, validate_kill_target};

/// Kills established connections with `ss -K`.
#[derive(Clone)]
pub struct ConnectionTerminator {
    runner: Arc<dyn CommandRunner>,
    inspector: ConnectionInspector,
}

impl ConnectionTerminator {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, inspector: ConnectionInspector) -> Self {
        Self { runner, inspector }
    }

    /// Kill the connection to one remote `address:port`.
    ///
    /// Success means `ss` exited cleanly; the connection is not re-checked.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] without running anything when either
    /// parameter is missing or the address is not an IP literal.
    pub async fn kill_one(
        &self,
        remote_address: Option<&str>,
        remote_port: Option<u16>,
    ) -> Result<ActionResponse, RequestError> {
        let target = validate_kill_target(remote_address, remote_port)?;
        let port = target.port.to_string();

        let outcome = self
            .runner
            .run(
                SS_PROGRAM,
                &["-K", "dst", target.address.as_str(), "dport", "=", port.as_str()],
            )
            .await;

        if outcome.succeeded {
            tracing::info!(address = %target.address, port = target.port, "killed connection");
            Ok(ActionResponse {
                success: true,
                message: format!(
                    "Killed SSH connection from {}:{}",
                    target.address, target.port
                ),
            })
        } else {
            let diagnostic = outcome.diagnostic();
            tracing::warn!(address = %target.address, port = target.port, error = %diagnostic, "kill failed");
            Ok(ActionResponse {
                success: false,
                message: format!("Failed to kill connection: {diagnostic}"),
            })
        }
    }

    /// Kill every established connection on the service port.
    ///
    /// `killed` is the number of connections seen just before the kill, not
    /// a verified count of what `ss` actually closed. With nothing to kill
    /// no command is run.
    pub async fn kill_all(&self) -> KillAllResponse {
        let count = self.inspector.list_established().await.len();
        if count == 0 {
            return KillAllResponse {
                success: true,
                message: "No SSH connections to kill".to_string(),
                killed: 0,
            };
        }

        let filter = source_port_filter(self.inspector.port());
        let outcome = self
            .runner
            .run(SS_PROGRAM, &["-K", "state", "established", filter.as_str()])
            .await;

        if outcome.succeeded {
            tracing::info!(killed = count, "killed all connections");
            KillAllResponse {
                success: true,
                message: format!("Killed {count} SSH connection(s)"),
                killed: count,
            }
        } else {
            let diagnostic = outcome.diagnostic();
            tracing::warn!(error = %diagnostic, "kill-all failed");
            KillAllResponse {
                success: false,
                message: format!("Failed to kill connections: {diagnostic}"),
                killed: 0,
            }
        }
    }
}
