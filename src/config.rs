use std::env;
use std::path::PathBuf;

/// Runtime options, assembled from the command line and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `-h`: print usage and quit.
    pub show_help: bool,
    /// `-v`: log at debug level.
    pub verbose: bool,
    /// Cleared by `-p`.
    pub emit_prompt: bool,
    /// env_logger filter string.
    pub log_filter: String,
    /// Where interactive sessions keep their history.
    pub history_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_parts(env::args().skip(1), |key| env::var(key).ok())
    }

    fn from_parts<I, F>(args: I, var: F) -> Self
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config {
            show_help: false,
            verbose: false,
            emit_prompt: true,
            log_filter: String::new(),
            history_file: None,
        };

        for arg in args {
            match arg.as_str() {
                "-h" => config.show_help = true,
                "-v" => config.verbose = true,
                "-p" => config.emit_prompt = false,
                _ => {}
            }
        }

        let default_filter = if config.verbose { "debug" } else { "warn" };
        config.log_filter = var("SMALLSH_LOG").unwrap_or_else(|| default_filter.to_string());

        config.history_file = var("SMALLSH_HISTORY")
            .map(PathBuf::from)
            .or_else(|| dirs_next::data_dir().map(|dir| dir.join("smallsh").join("history")));

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_parts(args(&[]), |_| None);
        assert!(config.emit_prompt);
        assert!(!config.verbose);
        assert!(!config.show_help);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_flags() {
        let config = Config::from_parts(args(&["-v", "-p", "-x"]), |_| None);
        assert!(config.verbose);
        assert!(!config.emit_prompt);
        assert_eq!(config.log_filter, "debug");

        let config = Config::from_parts(args(&["-h"]), |_| None);
        assert!(config.show_help);
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_parts(args(&["-v"]), |key| match key {
            "SMALLSH_LOG" => Some("smallsh=trace".to_string()),
            "SMALLSH_HISTORY" => Some("/tmp/smallsh-history".to_string()),
            _ => None,
        });
        assert_eq!(config.log_filter, "smallsh=trace");
        assert_eq!(
            config.history_file,
            Some(PathBuf::from("/tmp/smallsh-history"))
        );
    }
}
