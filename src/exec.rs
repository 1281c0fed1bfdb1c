use std::convert::Infallible;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::process;

use log::{debug, warn};
use nix::errno::Errno;
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{dup2, execvp, fork, ForkResult, Pid};
use thiserror::Error;

use crate::parser::Command;
use crate::signals::{reset_child_signals, SignalPolicy};
use crate::status::{ExitStatus, StatusTracker};

/// Exit code of a child that failed before or during exec.
const CHILD_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("fork failed: {0}")]
    Spawn(#[source] Errno),
    #[error("waitpid failed: {0}")]
    Wait(#[source] Errno),
}

/// Executes an external command.
///
/// The child resets its signal dispositions, applies redirections and execs
/// `command.program`. The parent either waits for it, recording the outcome
/// in `command.exit_status` and `tracker`, or, when the command asked for
/// background and `policy` allows it, announces the PID and hands it to the
/// tracker.
pub fn execute_command(
    command: &mut Command,
    policy: SignalPolicy,
    tracker: &mut StatusTracker,
) -> Result<(), ExecError> {
    // Anything still buffered would otherwise be written twice.
    let _ = io::stdout().flush();

    match unsafe { fork() }.map_err(ExecError::Spawn)? {
        ForkResult::Child => run_child(command),
        ForkResult::Parent { child } => {
            debug!("spawned {} for {:?}", child, command.arguments);
            if command.background && policy == SignalPolicy::BackgroundAllowed {
                println!("background pid is {}", child);
                let _ = io::stdout().flush();
                command.child_pid = Some(child);
                tracker.track_background(child, command.arguments.join(" "));
            } else {
                let status = wait_foreground(child)?;
                debug!("foreground {} finished: {}", child, status);
                command.exit_status = Some(status);
                tracker.record(status);
            }
            Ok(())
        }
    }
}

/// Polls every outstanding background child without blocking and prints a
/// notice for each one that has finished.
pub fn reap_background(tracker: &mut StatusTracker) {
    for pid in tracker.outstanding() {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => {}
            Ok(status) => {
                if let Some(status) = ExitStatus::from_wait(status) {
                    debug!("reaped background {}: {}", pid, status);
                    if let Some(notice) = tracker.finish_background(pid, status) {
                        println!("{}", notice);
                    }
                }
            }
            Err(Errno::EINTR) => {}
            Err(err) => {
                if let Some(job) = tracker.forget_background(pid) {
                    warn!("dropping background {} ({}): {}", pid, job.cmdline, err);
                }
            }
        }
    }
    let _ = io::stdout().flush();
}

fn wait_foreground(child: Pid) -> Result<ExitStatus, ExecError> {
    loop {
        match waitpid(child, None) {
            Ok(status) => {
                if let Some(status) = ExitStatus::from_wait(status) {
                    return Ok(status);
                }
            }
            // SIGTSTP landed while we were blocked.
            Err(Errno::EINTR) => continue,
            Err(err) => return Err(ExecError::Wait(err)),
        }
    }
}

fn run_child(command: &Command) -> ! {
    if let Err(err) = reset_child_signals() {
        warn!("could not reset child signals: {}", err);
    }

    if let Some(path) = &command.input_redirect {
        match File::open(path) {
            Ok(file) => redirect(&file, STDIN_FILENO),
            Err(_) => child_exit(&format!("Cannot open {} for input", path)),
        }
    }

    if let Some(path) = &command.output_redirect {
        let opened = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(path);
        match opened {
            Ok(file) => redirect(&file, STDOUT_FILENO),
            Err(_) => child_exit(&format!("Cannot open {} for output", path)),
        }
    }

    let Err(err) = exec(command);
    debug!("exec {} failed: {}", command.program, err);
    child_exit("error in execvp, bad command")
}

fn redirect(file: &File, target: RawFd) {
    if let Err(err) = dup2(file.as_raw_fd(), target) {
        child_exit(&format!("dup2: {}", err));
    }
}

fn exec(command: &Command) -> Result<Infallible, Errno> {
    let program = CString::new(command.program.as_bytes()).map_err(|_| Errno::EINVAL)?;
    let args = command
        .arguments
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| Errno::EINVAL)?;
    execvp(&program, &args)
}

fn child_exit(message: &str) -> ! {
    println!("{}", message);
    let _ = io::stdout().flush();
    process::exit(CHILD_FAILURE);
}
