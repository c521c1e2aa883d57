//! Application entry point.
//!
//! Parses command-line arguments and delegates execution to [`runner::run`].

use clap::Parser;
use csscat::{cli::Cli, runner};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::fmt;

fn main() -> ExitCode {
    let cli = Cli::parse();
    fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .init();
    match runner::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("runner failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
