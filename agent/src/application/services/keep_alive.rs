//! Application service — keep-alive session lifecycle.
//!
//! At most one keep-alive child exists at a time. The session slot is the
//! only shared mutable state in the agent; every transition happens under
//! its mutex and no lock is held across an `.await`.
//!
//! Each started child is owned by a watcher task. The watcher is the only
//! code that touches the child handle: it reaps the process when it exits
//! on its own, and it delivers SIGTERM when `stop` asks it to. Both paths
//! end in the same generation-checked clear, so they can race freely.

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::sync::oneshot;

use crate::application::ports::CommandRunner;
use crate::domain::keep_alive::SSH_PROGRAM;
use crate::domain::{ExitRecord, KeepAliveError, KeepAliveSettings};

/// How long a stopped child gets to exit after SIGTERM before SIGKILL.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// Snapshot returned by [`KeepAliveManager::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveStatus {
    pub active: bool,
    pub pid: Option<u32>,
    pub last_exit: Option<ExitRecord>,
}

enum SessionState {
    Idle,
    Active(ActiveSession),
}

struct ActiveSession {
    pid: u32,
    generation: u64,
    stop_tx: oneshot::Sender<()>,
}

struct Slot {
    state: SessionState,
    /// Generation of the most recently started session.
    generation: u64,
    last_exit: Option<ExitRecord>,
}

impl Slot {
    /// Clear the slot only if it still holds session `generation`.
    fn clear_if(&mut self, generation: u64) -> bool {
        match &self.state {
            SessionState::Active(session) if session.generation == generation => {
                self.state = SessionState::Idle;
                true
            }
            _ => false,
        }
    }
}

/// Owns the single keep-alive SSH link.
#[derive(Clone)]
pub struct KeepAliveManager {
    runner: Arc<dyn CommandRunner>,
    settings: KeepAliveSettings,
    slot: Arc<Mutex<Slot>>,
}

impl KeepAliveManager {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, settings: KeepAliveSettings) -> Self {
        Self {
            runner,
            settings,
            slot: Arc::new(Mutex::new(Slot {
                state: SessionState::Idle,
                generation: 0,
                last_exit: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        lock_slot(&self.slot)
    }

    /// Current session state. Always succeeds.
    #[must_use]
    pub fn status(&self) -> KeepAliveStatus {
        let slot = self.lock();
        let pid = match &slot.state {
            SessionState::Active(session) => Some(session.pid),
            SessionState::Idle => None,
        };
        KeepAliveStatus {
            active: pid.is_some(),
            pid,
            last_exit: slot.last_exit.clone(),
        }
    }

    /// Launch the keep-alive link and return its pid.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`KeepAliveError::AlreadyRunning`] if a session is active (it is left
    /// untouched), [`KeepAliveError::Launch`] if the child cannot be spawned.
    pub fn start(&self) -> Result<u32, KeepAliveError> {
        let mut slot = self.lock();
        if matches!(slot.state, SessionState::Active(_)) {
            return Err(KeepAliveError::AlreadyRunning);
        }

        let args = self.settings.ssh_args();
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let child = self.runner.spawn(SSH_PROGRAM, &argv).map_err(|e| {
            tracing::error!(error = %format!("{e:#}"), "keep-alive failed to launch");
            KeepAliveError::Launch(format!("{e:#}"))
        })?;
        let Some(pid) = child.id() else {
            tracing::error!("keep-alive exited before it could be tracked");
            return Err(KeepAliveError::Launch(
                "process exited before it could be tracked".to_string(),
            ));
        };

        slot.generation += 1;
        let generation = slot.generation;
        let (stop_tx, stop_rx) = oneshot::channel();
        slot.state = SessionState::Active(ActiveSession {
            pid,
            generation,
            stop_tx,
        });
        drop(slot);

        tokio::spawn(watch(Arc::clone(&self.slot), child, generation, stop_rx));
        tracing::info!(pid, host = %self.settings.host, "keep-alive started");
        Ok(pid)
    }

    /// Stop the keep-alive link and return the pid that was signalled.
    ///
    /// The slot is cleared immediately; the watcher delivers SIGTERM and
    /// reaps the child in the background.
    ///
    /// # Errors
    ///
    /// [`KeepAliveError::NotRunning`] if no session is active.
    pub fn stop(&self) -> Result<u32, KeepAliveError> {
        let mut slot = self.lock();
        let SessionState::Active(session) = std::mem::replace(&mut slot.state, SessionState::Idle)
        else {
            return Err(KeepAliveError::NotRunning);
        };
        drop(slot);

        // The watcher may already have seen the exit; nothing left to signal.
        let _ = session.stop_tx.send(());
        tracing::info!(pid = session.pid, "keep-alive stopped");
        Ok(session.pid)
    }
}

fn lock_slot(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Own `child` until it exits, then clear session `generation`.
async fn watch(
    slot: Arc<Mutex<Slot>>,
    mut child: Child,
    generation: u64,
    stop_rx: oneshot::Receiver<()>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = stop_rx => terminate(&mut child).await,
    };

    let record = match status {
        Ok(status) => exit_record(status),
        Err(e) => {
            tracing::warn!(error = %e, "failed to reap keep-alive process");
            ExitRecord::default()
        }
    };

    let mut guard = lock_slot(&slot);
    let cleared = guard.clear_if(generation);
    if guard.generation == generation {
        guard.last_exit = Some(record.clone());
    }
    drop(guard);

    if record.code == Some(0) {
        tracing::info!(cleared, "keep-alive exited");
    } else {
        tracing::warn!(
            code = ?record.code,
            signal = ?record.signal,
            cleared,
            "keep-alive exited",
        );
    }
}

/// SIGTERM the child, escalating to SIGKILL after [`STOP_GRACE`].
async fn terminate(child: &mut Child) -> std::io::Result<ExitStatus> {
    // `id()` is `None` once the child has been reaped, so a recycled pid is
    // never signalled.
    if let Some(pid) = child.id().and_then(|pid| i32::try_from(pid).ok()) {
        if let Err(e) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
            tracing::warn!(pid, error = %e, "failed to signal keep-alive");
        }
    }

    if let Ok(status) = tokio::time::timeout(STOP_GRACE, child.wait()).await {
        status
    } else {
        tracing::warn!("keep-alive ignored SIGTERM; killing");
        child.kill().await?;
        child.wait().await
    }
}

fn exit_record(status: ExitStatus) -> ExitRecord {
    ExitRecord::new(status.code(), status.signal())
}
