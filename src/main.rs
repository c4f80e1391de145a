//! conform CLI entry point
//!
//! The binary stays thin: argument parsing and command dispatch live in
//! `cli::run`. This function only prints the error to stderr and exits
//! non-zero when a command fails.

use conform::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
