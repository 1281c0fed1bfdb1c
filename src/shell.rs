use log::debug;
use thiserror::Error;

use crate::builtins::{handle_builtin, Builtin};
use crate::config::Config;
use crate::exec::{execute_command, reap_background};
use crate::parser::{parse_command_line, truncate_line};
use crate::readline::{LineReader, ReadlineError};
use crate::signals::current_policy;
use crate::status::StatusTracker;

/// Global prompt string.
pub static PROMPT: &str = ": ";

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("reading input: {0}")]
    Input(#[from] ReadlineError),
}

/// Runs the main shell loop: prints the prompt (if enabled), reads input,
/// parses it, and evaluates commands until `exit` or end of input.
pub fn run_shell(config: &Config) -> Result<(), ShellError> {
    let mut tracker = StatusTracker::new();
    let mut reader = LineReader::new(config);

    loop {
        // Background children that finished since the last command.
        reap_background(&mut tracker);

        let raw = match reader.read_line()? {
            Some(line) => line,
            None => break, // End-of-file (Ctrl-D)
        };
        let line = truncate_line(&raw);
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        debug!("received command: {}", line);

        // Fresh command per line; nothing carries over from the last one.
        let mut command = match parse_command_line(line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("smallsh: {}", e);
                continue;
            }
        };

        match handle_builtin(&command, &mut tracker) {
            Builtin::Exit => break,
            Builtin::Handled => continue,
            Builtin::External => {}
        }

        if let Err(e) = execute_command(&mut command, current_policy(), &mut tracker) {
            eprintln!("smallsh: {}", e);
            continue;
        }

        if let Some(pid) = command.child_pid {
            debug!("{} left running in the background", pid);
        }
        // Repeats after every external command until `status` clears it.
        if let Some(sig) = tracker.last().signal() {
            println!("terminated by signal {}", sig);
        }
    }

    reader.save_history();
    debug!(
        "leaving with {} background children, last status {}",
        tracker.outstanding().len(),
        tracker.last()
    );
    Ok(())
}
