/*
 * myint.rs - Foreground-kill helper for smallsh
 *
 * usage: myint <n>
 * Sleeps for <n> seconds, then raises SIGINT. Under smallsh the child runs
 * with the default SIGINT action, so it dies and the shell reports signal 2.
 */

use nix::sys::signal::{raise, Signal};
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

    if let Err(err) = raise(Signal::SIGINT) {
        eprintln!("raise (int) error: {}", err);
        process::exit(1);
    }

    // Still here: SIGINT was ignored.
    println!("myint survived SIGINT");
    process::exit(0);
}
