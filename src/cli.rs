// CLI definitions using clap

use beamer_transport::protocol::serial;
use beamer_transport::{DataBits, Parity, StopBits};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use beamerctl::OutputFormat;

#[derive(Parser)]
#[command(name = "beamerctl")]
#[command(author, version, about = "Send RS232 control commands to a projector")]
pub struct Cli {
    /// Command to send (on, off, status, showon, showoff, ...)
    #[arg(required_unless_present_any = ["list_commands", "list_ports"])]
    pub command: Option<String>,

    /// Serial port the projector is attached to
    #[arg(short, long, default_value = serial::DEFAULT_PORT)]
    pub port: String,

    /// Baud rate
    #[arg(short, long, default_value_t = serial::DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Data bits per character
    #[arg(long, value_enum, default_value_t = DataBitsArg::Eight)]
    pub data_bits: DataBitsArg,

    /// Parity checking
    #[arg(long, value_enum, default_value_t = ParityArg::None)]
    pub parity: ParityArg,

    /// Stop bits per character
    #[arg(long, value_enum, default_value_t = StopBitsArg::One)]
    pub stop_bits: StopBitsArg,

    /// Per-read timeout; the reply ends at the first read that times out
    #[arg(long, value_name = "MS", default_value_t = serial::READ_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Built-in command set [default: canon]
    #[arg(long = "set", value_enum, conflicts_with = "commands")]
    pub command_set: Option<BuiltinSet>,

    /// Load the command set from a TOML file
    #[arg(long, value_name = "FILE")]
    pub commands: Option<PathBuf>,

    /// Output format for the reply
    #[arg(long, value_enum, default_value_t = OutputFormat::Hex)]
    pub format: OutputFormat,

    /// Decode status replies (power state)
    #[arg(long)]
    pub decode: bool,

    /// Print all bytes sent and received
    #[arg(long)]
    pub monitor: bool,

    /// List the commands of the active set and exit
    #[arg(long)]
    pub list_commands: bool,

    /// List serial ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Built-in command sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuiltinSet {
    /// Canon binary protocol with status query
    Canon,
    /// Canon binary protocol without status query
    CanonLegacy,
    /// BenQ ASCII protocol
    Benq,
}

impl BuiltinSet {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinSet::Canon => "canon",
            BuiltinSet::CanonLegacy => "canon-legacy",
            BuiltinSet::Benq => "benq",
        }
    }
}

/// `--data-bits` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataBitsArg {
    #[value(name = "5")]
    Five,
    #[value(name = "6")]
    Six,
    #[value(name = "7")]
    Seven,
    #[value(name = "8")]
    Eight,
}

impl From<DataBitsArg> for DataBits {
    fn from(arg: DataBitsArg) -> Self {
        match arg {
            DataBitsArg::Five => DataBits::Five,
            DataBitsArg::Six => DataBits::Six,
            DataBitsArg::Seven => DataBits::Seven,
            DataBitsArg::Eight => DataBits::Eight,
        }
    }
}

/// `--parity` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParityArg {
    None,
    Odd,
    Even,
}

impl From<ParityArg> for Parity {
    fn from(arg: ParityArg) -> Self {
        match arg {
            ParityArg::None => Parity::None,
            ParityArg::Odd => Parity::Odd,
            ParityArg::Even => Parity::Even,
        }
    }
}

/// `--stop-bits` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StopBitsArg {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

impl From<StopBitsArg> for StopBits {
    fn from(arg: StopBitsArg) -> Self {
        match arg {
            StopBitsArg::One => StopBits::One,
            StopBitsArg::Two => StopBits::Two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["beamerctl", "on"]).unwrap();
        assert_eq!(cli.command.as_deref(), Some("on"));
        assert_eq!(cli.port, "/dev/ttyUSB0");
        assert_eq!(cli.baud, 19200);
        assert_eq!(cli.timeout_ms, 100);
        assert_eq!(cli.command_set, None);
        assert_eq!(cli.format, OutputFormat::Hex);
        assert_eq!(cli.data_bits, DataBitsArg::Eight);
        assert_eq!(cli.parity, ParityArg::None);
        assert_eq!(cli.stop_bits, StopBitsArg::One);
    }

    #[test]
    fn test_line_settings_flags() {
        let cli = Cli::try_parse_from([
            "beamerctl",
            "--data-bits",
            "7",
            "--parity",
            "even",
            "--stop-bits",
            "2",
            "status",
        ])
        .unwrap();
        assert_eq!(DataBits::from(cli.data_bits), DataBits::Seven);
        assert_eq!(Parity::from(cli.parity), Parity::Even);
        assert_eq!(StopBits::from(cli.stop_bits), StopBits::Two);

        assert!(Cli::try_parse_from(["beamerctl", "--data-bits", "9", "on"]).is_err());
        assert!(Cli::try_parse_from(["beamerctl", "--parity", "mark", "on"]).is_err());
    }

    #[test]
    fn test_missing_command_is_error() {
        assert!(Cli::try_parse_from(["beamerctl"]).is_err());
        assert!(Cli::try_parse_from(["beamerctl", "--list-commands"]).is_ok());
    }

    #[test]
    fn test_set_and_file_conflict() {
        assert!(
            Cli::try_parse_from(["beamerctl", "--set", "benq", "--commands", "x.toml", "on"])
                .is_err()
        );
        let cli = Cli::try_parse_from(["beamerctl", "--set", "canon-legacy", "off"]).unwrap();
        assert_eq!(cli.command_set, Some(BuiltinSet::CanonLegacy));
        assert_eq!(BuiltinSet::CanonLegacy.name(), "canon-legacy");
    }
}
