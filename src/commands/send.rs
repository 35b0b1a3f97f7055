//! Send one command and print the reply.

use std::io::{self, Write};

use beamer_transport::{BoxedTransport, CommandSet};
use beamerctl::{render, run_command};
use tracing::{debug, info};

use super::{load_command_set, monitored, open_transport, CommandResult};
use crate::cli::Cli;

/// Open the port, run the exchange and print the reply
pub fn send(cli: &Cli, command: &str) -> CommandResult {
    let set = load_command_set(cli)?;
    let transport = open_transport(cli)?;
    let mut stdout = io::stdout().lock();
    execute(cli, &set, command, transport, &mut stdout)
}

/// Run one command over an already open transport, writing the rendered reply to `out`
pub fn execute(
    cli: &Cli,
    set: &CommandSet,
    command: &str,
    transport: BoxedTransport,
    out: &mut impl Write,
) -> CommandResult {
    let info = transport.info();
    debug!("Using {} at {}", info.port, info.settings);

    let outcome = run_command(monitored(cli, transport), set, command)?;
    if outcome.response.is_empty() {
        info!("No reply from {}", cli.port);
    }

    for line in render(&outcome, cli.format, cli.decode) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
