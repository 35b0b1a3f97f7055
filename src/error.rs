//! Error type for beamerctl operations

use beamer_transport::{TransportError, UnknownCommand};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors from a single beamerctl run
#[derive(Error, Debug)]
pub enum Error {
    /// Command name not in the active command set
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommand),

    /// Port open, write or read failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Command-set file could not be used
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
