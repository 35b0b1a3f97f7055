// beamerctl - shared library
// Command-set configuration, single-shot command runs and reply rendering

pub mod config;
pub mod error;
pub mod render;
pub mod run;

pub use config::{CommandSource, ConfigError};
pub use error::{Error, Result};
pub use render::{render, OutputFormat};
pub use run::{run_command, Decoded, Outcome};
