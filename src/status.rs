use std::collections::BTreeMap;
use std::fmt;

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(i32),
}

impl ExitStatus {
    /// Converts a terminal `waitpid` result. Non-terminal states yield `None`.
    pub fn from_wait(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(ExitStatus::Exited(code)),
            WaitStatus::Signaled(_, sig, _) => Some(ExitStatus::Signaled(sig as i32)),
            _ => None,
        }
    }

    pub fn signal(&self) -> Option<i32> {
        match *self {
            ExitStatus::Signaled(sig) => Some(sig),
            ExitStatus::Exited(_) => None,
        }
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        ExitStatus::Exited(0)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit value {}", code),
            ExitStatus::Signaled(sig) => write!(f, "terminated by signal {}", sig),
        }
    }
}

/// A background child that has not been reaped yet.
#[derive(Debug)]
pub struct BackgroundJob {
    pub pid: Pid,
    pub cmdline: String,
}

/// Last foreground outcome plus every outstanding background child, keyed by
/// PID.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: ExitStatus,
    background: BTreeMap<i32, BackgroundJob>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the outcome of a foreground child.
    pub fn record(&mut self, status: ExitStatus) {
        self.last = status;
    }

    pub fn last(&self) -> ExitStatus {
        self.last
    }

    /// Formats the stored outcome for `status`, then resets it to a clean
    /// exit so the next report starts fresh.
    pub fn report(&mut self) -> String {
        let line = self.last.to_string();
        self.last = ExitStatus::default();
        line
    }

    pub fn track_background(&mut self, pid: Pid, cmdline: String) {
        self.background
            .insert(pid.as_raw(), BackgroundJob { pid, cmdline });
    }

    /// PIDs still waiting to be reaped, in ascending order.
    pub fn outstanding(&self) -> Vec<Pid> {
        self.background.values().map(|job| job.pid).collect()
    }

    /// Drops a finished background child and returns its completion notice.
    /// The foreground outcome is left alone.
    pub fn finish_background(&mut self, pid: Pid, status: ExitStatus) -> Option<String> {
        self.background
            .remove(&pid.as_raw())
            .map(|job| format!("background pid {} is done: {}", job.pid, status))
    }

    /// Forgets a background child that can no longer be waited on.
    pub fn forget_background(&mut self, pid: Pid) -> Option<BackgroundJob> {
        self.background.remove(&pid.as_raw())
    }
}
