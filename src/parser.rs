use nix::unistd::Pid;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::status::ExitStatus;

/// Longest line payload the shell accepts; anything past it is dropped.
pub const MAX_LINE: usize = 2048;

/// Decimal PID of this shell, substituted for every `$$`.
static SHELL_PID: Lazy<String> = Lazy::new(|| std::process::id().to_string());

/// A single parsed command line.
#[derive(Debug, Default)]
pub struct Command {
    /// Program to execute, always equal to `arguments[0]`.
    pub program: String,
    /// Argument vector handed to exec, program name included.
    pub arguments: Vec<String>,
    /// Input redirection file, if any.
    pub input_redirect: Option<String>,
    /// Output redirection file, if any.
    pub output_redirect: Option<String>,
    /// Whether a `&` token was present.
    pub background: bool,
    /// Outcome of the foreground child, once it has been waited on.
    pub exit_status: Option<ExitStatus>,
    /// PID of the background child launched for this command.
    pub child_pid: Option<Pid>,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no file name after `{0}`")]
    EmptyToken(&'static str),
    #[error("no command to run")]
    MissingProgram,
}

/// Parses a line (without its trailing newline) into a `Command`.
///
/// Tokens are separated by whitespace. `<` and `>` take the following token as
/// a file name, a lone `&` marks the command as background wherever it
/// appears, and every other token becomes an argument after `$$` expansion.
pub fn parse_command_line(line: &str) -> Result<Command, ParseError> {
    parse_with_pid(line, &SHELL_PID)
}

fn parse_with_pid(line: &str, pid: &str) -> Result<Command, ParseError> {
    let mut cmd = Command::default();
    let mut tokens = tokenize(line).into_iter();

    while let Some(token) = tokens.next() {
        match token {
            "<" => {
                let file = tokens.next().ok_or(ParseError::EmptyToken("<"))?;
                cmd.input_redirect = Some(expand_pid(file, pid));
            }
            ">" => {
                let file = tokens.next().ok_or(ParseError::EmptyToken(">"))?;
                cmd.output_redirect = Some(expand_pid(file, pid));
            }
            "&" => cmd.background = true,
            _ => cmd.arguments.push(expand_pid(token, pid)),
        }
    }

    cmd.program = cmd
        .arguments
        .first()
        .cloned()
        .ok_or(ParseError::MissingProgram)?;
    Ok(cmd)
}

/// Cuts `line` down to at most `MAX_LINE` characters.
pub fn truncate_line(line: &str) -> &str {
    match line.char_indices().nth(MAX_LINE) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

fn tokenize(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

/// Replaces each `$$` in `token`, scanning left to right without overlap.
fn expand_pid(token: &str, pid: &str) -> String {
    token.replace("$$", pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_whitespace() {
        assert_eq!(tokenize("  ls\t-l   /tmp "), vec!["ls", "-l", "/tmp"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_output_redirect() {
        let cmd = parse_command_line("echo hi > out.txt").unwrap();
        assert_eq!(cmd.program, "echo");
        assert_eq!(cmd.arguments, vec!["echo", "hi"]);
        assert_eq!(cmd.output_redirect.as_deref(), Some("out.txt"));
        assert_eq!(cmd.input_redirect, None);
        assert!(!cmd.background);
    }

    #[test]
    fn test_background() {
        let cmd = parse_command_line("sleep 5 &").unwrap();
        assert_eq!(cmd.arguments, vec!["sleep", "5"]);
        assert!(cmd.background);
        assert!(cmd.exit_status.is_none());
        assert!(cmd.child_pid.is_none());
    }

    #[test]
    fn test_both_redirects() {
        let cmd = parse_command_line("wc < in.txt > out.txt").unwrap();
        assert_eq!(cmd.arguments, vec!["wc"]);
        assert_eq!(cmd.input_redirect.as_deref(), Some("in.txt"));
        assert_eq!(cmd.output_redirect.as_deref(), Some("out.txt"));
    }

    #[test]
    fn test_interior_ampersand_still_backgrounds() {
        let cmd = parse_command_line("sleep & 5").unwrap();
        assert_eq!(cmd.arguments, vec!["sleep", "5"]);
        assert!(cmd.background);
    }

    #[test]
    fn test_ampersand_inside_word_is_literal() {
        let cmd = parse_command_line("echo a&b").unwrap();
        assert_eq!(cmd.arguments, vec!["echo", "a&b"]);
        assert!(!cmd.background);
    }

    #[test]
    fn test_dangling_redirect() {
        assert_eq!(
            parse_command_line("cat <").unwrap_err(),
            ParseError::EmptyToken("<")
        );
        assert_eq!(
            parse_command_line("ls >").unwrap_err(),
            ParseError::EmptyToken(">")
        );
    }

    #[test]
    fn test_missing_program() {
        assert_eq!(
            parse_command_line("< in.txt &").unwrap_err(),
            ParseError::MissingProgram
        );
    }

    #[test]
    fn test_pid_expansion() {
        let cmd = parse_with_pid("echo $$ a$$b$$ $$$ x$y", "4242").unwrap();
        assert_eq!(
            cmd.arguments,
            vec!["echo", "4242", "a4242b4242", "4242$", "x$y"]
        );
    }

    #[test]
    fn test_pid_expansion_in_redirect() {
        let cmd = parse_with_pid("ls > junk$$", "77").unwrap();
        assert_eq!(cmd.output_redirect.as_deref(), Some("junk77"));
    }

    #[test]
    fn test_pid_expansion_uses_own_pid() {
        let cmd = parse_command_line("echo $$").unwrap();
        assert_eq!(cmd.arguments[1], std::process::id().to_string());
    }

    #[test]
    fn test_truncate_line() {
        let long = "a".repeat(MAX_LINE + 10);
        assert_eq!(truncate_line(&long).len(), MAX_LINE);
        assert_eq!(truncate_line("ls -l"), "ls -l");
    }
}
