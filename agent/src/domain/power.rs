//! Classification of `systemctl suspend` outcomes.
//!
//! The same non-zero exit means different things depending on what logind
//! printed: an inhibitor lock (someone is still logged in) versus any other
//! failure. Callers rely on the distinction to decide what to tell the user.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::command::CommandOutcome;

/// Phrase logind prints when a sleep transition is blocked by an inhibitor.
pub const INHIBITOR_MARKER: &str = "Operation inhibited";

pub const SUSPEND_INITIATED: &str = "Suspend initiated successfully";

/// Shown when the command reports an inhibitor but no usable detail.
pub const GENERIC_INHIBITED_MESSAGE: &str = "Operation inhibited by \"SSH-Guard\" \
(PID unknown \"systemd-inhibit\", user root), reason is \"SSH Active\".\n\
Please retry operation after closing inhibitors and logging out other users.\n\
Alternatively, ignore inhibitors and users with 'systemctl suspend -i'.";

static INHIBITOR_DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"Operation inhibited by[^.]+").expect("valid regex")
});

static INHIBITOR_REASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"reason is "[^"]+""#).expect("valid regex")
});

/// What a suspend attempt amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuspendOutcome {
    Initiated,
    /// Blocked by an inhibitor lock; carries the explanation to show.
    Inhibited(String),
    /// Any other failure; carries the best available diagnostic.
    Failed(String),
}

impl SuspendOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Initiated)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Initiated => SUSPEND_INITIATED,
            Self::Inhibited(msg) | Self::Failed(msg) => msg,
        }
    }
}

/// Classify the outcome of `systemctl suspend`.
///
/// Exit success wins regardless of output. On failure, output containing
/// [`INHIBITOR_MARKER`] is an inhibitor: the raw output is surfaced verbatim
/// when it names the inhibitor or its reason, otherwise a generic
/// explanation is synthesized.
#[must_use]
pub fn classify_suspend(outcome: &CommandOutcome) -> SuspendOutcome {
    if outcome.succeeded {
        return SuspendOutcome::Initiated;
    }

    let output = &outcome.combined_output;
    if output.contains(INHIBITOR_MARKER) {
        let detailed = INHIBITOR_DETAIL_RE.is_match(output) || INHIBITOR_REASON_RE.is_match(output);
        let message = if detailed {
            output.trim().to_string()
        } else {
            GENERIC_INHIBITED_MESSAGE.to_string()
        };
        return SuspendOutcome::Inhibited(message);
    }

    SuspendOutcome::Failed(outcome.diagnostic())
}
