use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use log::{debug, warn};
pub use rustyline::error::ReadlineError;
use rustyline::{Config as RLConfig, DefaultEditor};

use crate::config::Config;
use crate::shell::PROMPT;

/// Source of input lines. A terminal gets line editing and history; anything
/// else (pipes, files) is read line by line.
pub enum LineReader {
    Editor {
        editor: DefaultEditor,
        history_file: Option<PathBuf>,
    },
    Plain {
        emit_prompt: bool,
    },
}

impl LineReader {
    pub fn new(config: &Config) -> Self {
        if config.emit_prompt && io::stdin().is_terminal() {
            match Self::editor(config) {
                Ok(reader) => return reader,
                Err(err) => warn!("line editing unavailable: {}", err),
            }
        }
        LineReader::Plain {
            emit_prompt: config.emit_prompt,
        }
    }

    fn editor(config: &Config) -> Result<Self, ReadlineError> {
        let rl_config = RLConfig::builder().history_ignore_space(true).build();
        let mut editor = DefaultEditor::with_config(rl_config)?;
        if let Some(path) = &config.history_file {
            if let Err(err) = editor.load_history(path) {
                debug!("no history loaded from {}: {}", path.display(), err);
            }
        }
        Ok(LineReader::Editor {
            editor,
            history_file: config.history_file.clone(),
        })
    }

    /// Returns the next line without its newline, or `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>, ReadlineError> {
        match self {
            LineReader::Editor { editor, .. } => match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.as_str())?;
                    }
                    Ok(Some(line))
                }
                // Ctrl-C at the prompt just abandons the line.
                Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
                Err(ReadlineError::Eof) => Ok(None),
                Err(err) => Err(err),
            },
            LineReader::Plain { emit_prompt } => {
                if *emit_prompt {
                    print!("{}", PROMPT);
                    io::stdout().flush()?;
                }
                let mut buf = Vec::new();
                if io::stdin().lock().read_until(b'\n', &mut buf)? == 0 {
                    return Ok(None);
                }
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
            }
        }
    }

    pub fn save_history(&mut self) {
        if let LineReader::Editor {
            editor,
            history_file: Some(path),
        } = self
        {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match editor.save_history(path) {
                Ok(()) => debug!("history saved to {}", path.display()),
                Err(err) => warn!("could not save history: {}", err),
            }
        }
    }
}
