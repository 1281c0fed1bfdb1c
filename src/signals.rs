use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::libc::STDOUT_FILENO;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use signal_hook::consts::signal::SIGTSTP;

const ENTER_FOREGROUND_ONLY: &str = "\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_FOREGROUND_ONLY: &str = "\nExiting foreground-only mode\n";

/// Whether `&` is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPolicy {
    ForegroundOnly,
    BackgroundAllowed,
}

impl SignalPolicy {
    /// Message printed when the shell switches into this policy.
    pub fn notice(&self) -> &'static str {
        match self {
            SignalPolicy::ForegroundOnly => ENTER_FOREGROUND_ONLY,
            SignalPolicy::BackgroundAllowed => EXIT_FOREGROUND_ONLY,
        }
    }
}

/// Lock-free holder for a `SignalPolicy`, safe to touch from a signal handler.
pub struct PolicyFlag {
    background_allowed: AtomicBool,
}

impl PolicyFlag {
    pub const fn new() -> Self {
        PolicyFlag {
            background_allowed: AtomicBool::new(true),
        }
    }

    pub fn get(&self) -> SignalPolicy {
        if self.background_allowed.load(Ordering::SeqCst) {
            SignalPolicy::BackgroundAllowed
        } else {
            SignalPolicy::ForegroundOnly
        }
    }

    /// Flips the policy and returns the new one.
    pub fn toggle(&self) -> SignalPolicy {
        let was_allowed = self.background_allowed.fetch_xor(true, Ordering::SeqCst);
        if was_allowed {
            SignalPolicy::ForegroundOnly
        } else {
            SignalPolicy::BackgroundAllowed
        }
    }
}

/// Shell-wide policy. Only the SIGTSTP handler mutates it.
static POLICY: PolicyFlag = PolicyFlag::new();

pub fn current_policy() -> SignalPolicy {
    POLICY.get()
}

/// Installs the shell's own dispositions:
/// - SIGINT (Ctrl-C) is ignored, so only foreground children die from it.
/// - SIGTSTP (Ctrl-Z) toggles foreground-only mode instead of stopping.
pub fn install_shell_signals() -> io::Result<()> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe { sigaction(Signal::SIGINT, &ignore) }?;

    // Runs in signal context: one atomic flip and one raw write(2), nothing else.
    unsafe {
        signal_hook::low_level::register(SIGTSTP, || {
            let policy = POLICY.toggle();
            let _ = nix::unistd::write(STDOUT_FILENO, policy.notice().as_bytes());
        })
    }?;
    Ok(())
}

/// Child-side dispositions, applied between fork and exec: SIGINT goes back
/// to its default action, SIGTSTP is ignored.
pub fn reset_child_signals() -> nix::Result<()> {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe {
        sigaction(Signal::SIGINT, &default)?;
        sigaction(Signal::SIGTSTP, &ignore)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_background_allowed() {
        let flag = PolicyFlag::new();
        assert_eq!(flag.get(), SignalPolicy::BackgroundAllowed);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let flag = PolicyFlag::new();
        assert_eq!(flag.toggle(), SignalPolicy::ForegroundOnly);
        assert_eq!(flag.get(), SignalPolicy::ForegroundOnly);
        assert_eq!(flag.toggle(), SignalPolicy::BackgroundAllowed);
        assert_eq!(flag.get(), SignalPolicy::BackgroundAllowed);
    }

    #[test]
    fn test_notices() {
        assert!(SignalPolicy::ForegroundOnly
            .notice()
            .contains("Entering foreground-only mode"));
        assert!(SignalPolicy::BackgroundAllowed
            .notice()
            .contains("Exiting foreground-only mode"));
    }
}
