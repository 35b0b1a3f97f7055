//! Command handlers for the CLI application.
//!
//! - `send`: send one command and print the reply
//! - `utility`: list commands and serial ports

pub mod send;
pub mod utility;

use std::time::Duration;

use anyhow::Context;
use beamer_transport::{
    BoxedTransport, CommandSet, PrinterConfig, PrinterTransport, SerialSettings, SerialTransport,
    TransportError,
};
use beamerctl::CommandSource;

use crate::cli::Cli;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Pick the command set requested on the command line
pub fn command_source(cli: &Cli) -> CommandSource {
    match (&cli.commands, cli.command_set) {
        (Some(path), _) => CommandSource::File(path.clone()),
        (None, Some(set)) => CommandSource::Builtin(set.name().to_string()),
        (None, None) => CommandSource::default(),
    }
}

/// Resolve the active command set
pub fn load_command_set(cli: &Cli) -> anyhow::Result<CommandSet> {
    let source = command_source(cli);
    let set = source
        .resolve()
        .with_context(|| format!("cannot load command set from {source}"))?;
    tracing::debug!("Using command set {} ({} commands)", set.name(), set.commands().len());
    Ok(set)
}

/// Line settings from the command line
pub fn serial_settings(cli: &Cli) -> SerialSettings {
    SerialSettings::default()
        .with_baud_rate(cli.baud)
        .with_data_bits(cli.data_bits.into())
        .with_parity(cli.parity.into())
        .with_stop_bits(cli.stop_bits.into())
        .with_read_timeout(Duration::from_millis(cli.timeout_ms))
}

/// Open the serial port, wrapped with the printer when monitoring
pub fn open_transport(cli: &Cli) -> Result<BoxedTransport, TransportError> {
    let port = SerialTransport::open(&cli.port, &serial_settings(cli))?;
    Ok(monitored(cli, Box::new(port)))
}

/// Wrap a transport with the traffic printer if `--monitor` is set
pub fn monitored(cli: &Cli, transport: BoxedTransport) -> BoxedTransport {
    if cli.monitor {
        let config = PrinterConfig::default().with_timeouts(cli.verbose);
        Box::new(PrinterTransport::wrap(transport, config))
    } else {
        transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamer_transport::{DataBits, Parity, StopBits};
    use clap::Parser;

    #[test]
    fn test_serial_settings_from_flags() {
        let cli = Cli::try_parse_from([
            "beamerctl", "-b", "9600", "--parity", "odd", "--stop-bits", "2", "--timeout-ms",
            "250", "on",
        ])
        .unwrap();
        let settings = serial_settings(&cli);
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.data_bits, DataBits::Eight);
        assert_eq!(settings.parity, Parity::Odd);
        assert_eq!(settings.stop_bits, StopBits::Two);
        assert_eq!(settings.read_timeout, Duration::from_millis(250));
        assert_eq!(settings.to_string(), "9600 8O2");
    }

    #[test]
    fn test_command_set_selection() {
        let cli = Cli::try_parse_from(["beamerctl", "--set", "benq", "on"]).unwrap();
        assert_eq!(load_command_set(&cli).unwrap().name(), "benq");

        let cli = Cli::try_parse_from(["beamerctl", "on"]).unwrap();
        assert_eq!(load_command_set(&cli).unwrap().name(), "canon");
    }

    #[test]
    fn test_missing_command_file_message() {
        let cli =
            Cli::try_parse_from(["beamerctl", "--commands", "/nonexistent/x.toml", "on"]).unwrap();
        let err = load_command_set(&cli).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot load command set from --commands /nonexistent/x.toml"
        );
    }
}
