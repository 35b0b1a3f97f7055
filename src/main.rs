//! beamerctl - RS232 projector control CLI
//!
//! Sends one command packet to a serial-attached projector and prints the
//! reply bytes.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::Cli;

// Command handlers
mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli) -> commands::CommandResult {
    if cli.list_ports {
        return commands::utility::list_ports();
    }
    if cli.list_commands {
        return commands::utility::list_commands(cli);
    }
    match cli.command.as_deref() {
        Some(command) => commands::send::send(cli, command),
        // clap enforces the positional unless a listing flag is given
        None => Ok(()),
    }
}

/// Log to stderr; RUST_LOG overrides the default level
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("beamerctl={default},beamer_transport={default}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
