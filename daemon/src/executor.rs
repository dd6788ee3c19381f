//! Forced process termination

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::warn;

/// Result of one termination attempt. The normal "process vanished between
/// snapshot and kill" path is a value here, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationOutcome {
    /// The kill request was accepted; the OS is tearing the process down.
    Terminated,
    /// No process with that pid exists anymore.
    NotFound,
    /// The OS refused the request, typically for lack of privilege.
    Denied,
}

pub trait ProcessKiller: Send + Sync {
    fn kill(&self, pid: u32) -> TerminationOutcome;
}

/// Sends SIGKILL once: an immediate, forced stop with no grace period and no
/// signal escalation.
pub struct SigkillExecutor;

impl ProcessKiller for SigkillExecutor {
    fn kill(&self, pid: u32) -> TerminationOutcome {
        match signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) => TerminationOutcome::Terminated,
            Err(Errno::ESRCH) => TerminationOutcome::NotFound,
            Err(Errno::EPERM) => TerminationOutcome::Denied,
            Err(errno) => {
                warn!("unexpected error from kill(2) for pid {}: {}", pid, errno);
                TerminationOutcome::Denied
            }
        }
    }
}
