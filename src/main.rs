mod builtins;
mod config;
mod exec;
mod parser;
mod readline;
mod shell;
mod signals;
mod status;
mod utils;

use config::Config;

fn main() {
    let config = Config::from_env();
    if config.show_help {
        utils::print_usage();
    }
    utils::init_logger(&config);

    // Install signal handlers.
    if let Err(e) = signals::install_shell_signals() {
        utils::error(&format!("unable to install signal handlers: {}", e));
    }

    // Run the main shell loop with the options.
    if let Err(e) = shell::run_shell(&config) {
        utils::error(&e.to_string());
    }
}
