//! Structured result of one OS command invocation.

/// Outcome of running an external program to completion.
///
/// Produced by every `CommandRunner::run` call, including spawn failures and
/// timeouts, so callers never deal with a raw `io::Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `true` only when the program ran and exited with status 0.
    pub succeeded: bool,
    /// Standard output followed by standard error, lossily decoded.
    pub combined_output: String,
    /// Why the command did not succeed: non-zero exit, spawn error, timeout.
    pub exit_error: Option<String>,
}

impl CommandOutcome {
    #[must_use]
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            combined_output: output.into(),
            exit_error: None,
        }
    }

    #[must_use]
    pub fn failure(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            combined_output: output.into(),
            exit_error: Some(error.into()),
        }
    }

    /// Best available diagnostic text: trimmed output, else the exit error.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let trimmed = self.combined_output.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
        self.exit_error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string())
    }
}
