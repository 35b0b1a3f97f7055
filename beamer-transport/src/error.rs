//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Cannot open {port}: {reason}")]
    Open { port: String, reason: String },

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Read failed: {0}")]
    Read(String),

    /// A single-byte read returned more data than requested
    #[error("Read returned {got} bytes, expected at most 1")]
    ReadOverrun { got: usize },

    #[error("Transport already closed")]
    Closed,

    #[error("Cannot list serial ports: {0}")]
    Enumerate(String),
}

impl TransportError {
    /// Build an open error from a serialport failure
    pub fn open(port: &str, e: serialport::Error) -> Self {
        TransportError::Open {
            port: port.to_string(),
            reason: e.description,
        }
    }
}

/// The command name is not part of the active command set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown command: {input:?}")]
pub struct UnknownCommand {
    /// Input exactly as the caller passed it
    pub input: String,
}
