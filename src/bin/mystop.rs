/*
 * mystop.rs - Foreground-only toggle helper for smallsh
 *
 * usage: mystop <n>
 * Sleeps for <n> seconds, then sends SIGTSTP to its parent. When the parent
 * is smallsh this flips foreground-only mode, just like Ctrl-Z would.
 */

use nix::sys::signal::{kill, Signal};
use nix::unistd::getppid;
use std::env;
use std::process;
use std::thread;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <n>", args[0]);
        process::exit(0);
    }

    let secs = args[1].parse::<u64>().unwrap_or_else(|_| {
        eprintln!("Error: <n> must be a non-negative integer");
        process::exit(1);
    });

    thread::sleep(Duration::from_secs(secs));

    if let Err(err) = kill(getppid(), Signal::SIGTSTP) {
        eprintln!("kill (tstp) error: {}", err);
        process::exit(1);
    }

    process::exit(0);
}
