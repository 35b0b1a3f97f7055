//! Command-set configuration
//!
//! Built-in sets, or a TOML table of commands loaded at runtime:
//!
//! ```toml
//! name = "living-room"
//!
//! [commands.on]
//! payload = [0x02, 0x00, 0x00, 0x00, 0x00]
//!
//! [commands.status]
//! text = "\r*pow=?#\r"
//! reply = "benq-power"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use beamer_transport::{normalize_name, ChecksumType, CommandSet, CommandSpec, ReplyKind};
use serde::Deserialize;
use thiserror::Error;

/// Errors while resolving a command set
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("command {name:?}: {reason}")]
    InvalidCommand { name: String, reason: String },

    #[error("no commands defined")]
    Empty,

    #[error("unknown command set: {0}")]
    UnknownSet(String),
}

/// Command-set file as written on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandFile {
    pub name: Option<String>,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandEntry>,
}

/// One `[commands.<name>]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandEntry {
    /// Binary payload, checksum excluded
    pub payload: Option<Vec<u8>>,
    /// ASCII payload, sent as is
    pub text: Option<String>,
    /// Defaults to `sum8` for `payload`, `none` for `text`
    pub checksum: Option<ChecksumType>,
    #[serde(default)]
    pub reply: ReplyKind,
}

impl CommandEntry {
    fn into_spec(self, name: &str) -> Result<CommandSpec, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidCommand {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let (bytes, default_checksum) = match (self.payload, self.text) {
            (Some(payload), None) => (payload, ChecksumType::Sum8),
            (None, Some(text)) => (text.into_bytes(), ChecksumType::None),
            (Some(_), Some(_)) => return Err(invalid("set either payload or text, not both")),
            (None, None) => return Err(invalid("missing payload or text")),
        };
        if bytes.is_empty() {
            return Err(invalid("empty payload"));
        }

        let checksum = self.checksum.unwrap_or(default_checksum);
        Ok(CommandSpec::new(name, &bytes, checksum).reply(self.reply))
    }
}

impl CommandFile {
    /// Convert into a command set; `fallback_name` is used when the file has none
    pub fn into_command_set(self, fallback_name: &str) -> Result<CommandSet, ConfigError> {
        let mut set = CommandSet::new(self.name.unwrap_or_else(|| fallback_name.to_string()));
        for (name, entry) in self.commands {
            if normalize_name(&name).is_empty() {
                return Err(ConfigError::InvalidCommand {
                    name,
                    reason: "empty name".into(),
                });
            }
            let spec = entry.into_spec(&name)?;
            if set.insert(spec).is_some() {
                return Err(ConfigError::InvalidCommand {
                    name,
                    reason: "defined more than once".into(),
                });
            }
        }
        if set.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(set)
    }
}

/// Parse a command set from TOML text
pub fn from_toml(content: &str, fallback_name: &str) -> Result<CommandSet, ConfigError> {
    let file: CommandFile = toml::from_str(content)?;
    file.into_command_set(fallback_name)
}

/// Load a command set from a TOML file
///
/// The file stem names the set unless the file sets `name`.
pub fn load(path: &Path) -> Result<CommandSet, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "custom".to_string());
    from_toml(&content, &fallback)
}

/// Where the active command set comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    Builtin(String),
    File(PathBuf),
}

impl Default for CommandSource {
    fn default() -> Self {
        CommandSource::Builtin("canon".to_string())
    }
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSource::Builtin(name) => write!(f, "built-in set {name}"),
            CommandSource::File(path) => write!(f, "--commands {}", path.display()),
        }
    }
}

impl CommandSource {
    pub fn resolve(&self) -> Result<CommandSet, ConfigError> {
        match self {
            CommandSource::Builtin(name) => {
                CommandSet::builtin(name).ok_or_else(|| ConfigError::UnknownSet(name.clone()))
            }
            CommandSource::File(path) => load(path),
        }
    }
}
