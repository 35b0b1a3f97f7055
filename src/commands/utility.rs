//! Utility command handlers.

use beamer_transport::available_ports;

use super::{load_command_set, CommandResult};
use crate::cli::Cli;

/// List the commands of the active set with their packets
pub fn list_commands(cli: &Cli) -> CommandResult {
    let set = load_command_set(cli)?;
    println!("Command set: {}", set.name());
    for spec in set.commands() {
        println!("  {:<10} {}", spec.name(), spec.packet());
    }
    Ok(())
}

/// List serial ports
pub fn list_ports() -> CommandResult {
    let ports = available_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }
    println!("Serial ports:");
    for port in ports {
        println!("  {:<20} {}", port.name, port.description);
    }
    Ok(())
}
