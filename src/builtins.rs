use std::env;
use std::path::PathBuf;

use log::debug;

use crate::parser::Command;
use crate::status::StatusTracker;

/// What the shell loop should do after looking at a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Builtin {
    /// Not a built-in; launch it as an external program.
    External,
    /// Handled here; read the next line.
    Handled,
    /// `exit` was entered.
    Exit,
}

/// Checks if the command is a built-in command and, if so, executes it.
/// Supported built-ins are "cd", "status" and "exit". Redirections and `&`
/// are ignored for built-ins.
pub fn handle_builtin(cmd: &Command, tracker: &mut StatusTracker) -> Builtin {
    match cmd.program.as_str() {
        "exit" => Builtin::Exit,
        "status" => {
            println!("{}", tracker.report());
            Builtin::Handled
        }
        "cd" => {
            if let Err(dir) = change_dir(cmd.arguments.get(1).map(String::as_str)) {
                debug!("cd to {:?} failed", dir);
                println!("Unknown directory");
            }
            Builtin::Handled
        }
        _ => Builtin::External,
    }
}

/// Changes to `target`, or to the home directory when it is omitted.
/// On failure returns the directory that could not be entered.
fn change_dir(target: Option<&str>) -> Result<(), Option<PathBuf>> {
    let dir = match target {
        Some(path) => PathBuf::from(path),
        None => match home_dir() {
            Some(home) => home,
            None => return Err(None),
        },
    };
    env::set_current_dir(&dir).map_err(|_| Some(dir))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(dirs_next::home_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_command_line;
    use crate::status::ExitStatus;

    #[test]
    fn test_external_passthrough() {
        let mut tracker = StatusTracker::new();
        let cmd = parse_command_line("ls -l").unwrap();
        assert_eq!(handle_builtin(&cmd, &mut tracker), Builtin::External);
    }

    #[test]
    fn test_exit() {
        let mut tracker = StatusTracker::new();
        let cmd = parse_command_line("exit").unwrap();
        assert_eq!(handle_builtin(&cmd, &mut tracker), Builtin::Exit);
    }

    #[test]
    fn test_status_resets_tracker() {
        let mut tracker = StatusTracker::new();
        tracker.record(ExitStatus::Signaled(9));
        let cmd = parse_command_line("status &").unwrap();
        assert_eq!(handle_builtin(&cmd, &mut tracker), Builtin::Handled);
        assert_eq!(tracker.last(), ExitStatus::Exited(0));
    }

    #[test]
    fn test_cd_unknown_directory() {
        let missing = "/nonexistent/smallsh-dir";
        assert_eq!(
            change_dir(Some(missing)),
            Err(Some(PathBuf::from(missing)))
        );
    }
}
