use std::io::Write;
use std::process;

use env_logger::{Builder, Target};

use crate::config::Config;

pub fn print_usage() {
    println!("Usage: smallsh [-hvp]");
    println!("   -h   Print this help message");
    println!("   -v   Enable verbose (debug) logging");
    println!("   -p   Do not print a command prompt");
    println!();
    println!("Environment: SMALLSH_LOG (log filter), SMALLSH_HISTORY (history file)");
    process::exit(1);
}

pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
    process::exit(1);
}

/// Sends log records to stderr, tagged with the emitting PID so forked
/// children are distinguishable from the shell.
pub fn init_logger(config: &Config) {
    Builder::new()
        .parse_filters(&config.log_filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[PID:{}][{}] {}",
                process::id(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .init();
}
