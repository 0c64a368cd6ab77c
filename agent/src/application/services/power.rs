//! Application service — system suspend use-case.

use std::sync::Arc;

use wakehost_common::ActionResponse;

use crate::application::ports::CommandRunner;
use crate::domain::{SuspendOutcome, classify_suspend};

pub const SYSTEMCTL_PROGRAM: &str = "systemctl";

/// Issues `systemctl suspend` and explains the result.
#[derive(Clone)]
pub struct PowerController {
    runner: Arc<dyn CommandRunner>,
}

impl PowerController {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Attempt to suspend the host.
    pub async fn suspend(&self) -> ActionResponse {
        let outcome = self.runner.run(SYSTEMCTL_PROGRAM, &["suspend"]).await;
        let result = classify_suspend(&outcome);

        match &result {
            SuspendOutcome::Initiated => tracing::info!("suspend initiated"),
            SuspendOutcome::Inhibited(msg) => tracing::warn!(reason = %msg, "suspend inhibited"),
            SuspendOutcome::Failed(msg) => tracing::warn!(error = %msg, "suspend failed"),
        }

        ActionResponse {
            success: result.succeeded(),
            message: result.message().to_string(),
        }
    }
}
