//! Command specs, command sets and packet encoding
//!
//! A [`CommandSet`] is a fixed table of named commands. Encoding looks a name
//! up (trimmed, case-insensitive) and appends the command's checksum byte to
//! its payload. Nothing here touches a transport.

use std::fmt;

use crate::error::UnknownCommand;
use crate::protocol::{self, benq, canon};
use crate::types::{ChecksumType, ReplyKind};

// =============================================================================
// Packet
// =============================================================================

/// Bytes written to the transport for one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet(Vec<u8>);

impl Packet {
    /// Encode a payload with its checksum
    pub fn new(payload: &[u8], checksum: ChecksumType) -> Self {
        Self(protocol::build_packet(payload, checksum))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&protocol::hex_string(&self.0))
    }
}

// =============================================================================
// CommandSpec
// =============================================================================

/// A named command and how to encode it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    name: String,
    payload: Vec<u8>,
    checksum: ChecksumType,
    reply: ReplyKind,
}

impl CommandSpec {
    /// Create a command; the name is normalized the same way lookups are
    pub fn new(name: &str, payload: &[u8], checksum: ChecksumType) -> Self {
        Self {
            name: normalize_name(name),
            payload: payload.to_vec(),
            checksum,
            reply: ReplyKind::Raw,
        }
    }

    /// ASCII command sent verbatim
    pub fn text(name: &str, text: &str) -> Self {
        Self::new(name, text.as_bytes(), ChecksumType::None)
    }

    /// Set how replies to this command are decoded
    pub fn reply(mut self, reply: ReplyKind) -> Self {
        self.reply = reply;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn checksum(&self) -> ChecksumType {
        self.checksum
    }

    pub fn reply_kind(&self) -> ReplyKind {
        self.reply
    }

    /// Build a fresh packet for this command
    pub fn packet(&self) -> Packet {
        Packet::new(&self.payload, self.checksum)
    }
}

/// Lookup key for a command name: surrounding whitespace removed, lowercased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// CommandSet
// =============================================================================

/// Names of the built-in command sets
pub const BUILTIN_SETS: &[&str] = &["canon", "canon-legacy", "benq"];

/// An ordered table of commands for one device family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    name: String,
    commands: Vec<CommandSpec>,
}

impl CommandSet {
    /// Create an empty set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Add a command, replacing an existing one with the same name
    pub fn with(mut self, spec: CommandSpec) -> Self {
        self.insert(spec);
        self
    }

    /// Add a command; returns the replaced command if the name was taken
    pub fn insert(&mut self, spec: CommandSpec) -> Option<CommandSpec> {
        match self.commands.iter_mut().find(|c| c.name == spec.name) {
            Some(existing) => Some(std::mem::replace(existing, spec)),
            None => {
                self.commands.push(spec);
                None
            }
        }
    }

    /// Canon binary protocol including the status query
    pub fn canon() -> Self {
        Self::canon_base("canon").with(
            CommandSpec::new("status", &canon::GET_STATUS, ChecksumType::Sum8)
                .reply(ReplyKind::CanonStatus),
        )
    }

    /// Canon binary protocol without the status query
    pub fn canon_legacy() -> Self {
        Self::canon_base("canon-legacy")
    }

    fn canon_base(name: &str) -> Self {
        Self::new(name)
            .with(CommandSpec::new("on", &canon::POWER_ON, ChecksumType::Sum8))
            .with(CommandSpec::new("off", &canon::POWER_OFF, ChecksumType::Sum8))
            .with(CommandSpec::new("showoff", &canon::SHOW_OFF, ChecksumType::Sum8))
            .with(CommandSpec::new("showon", &canon::SHOW_ON, ChecksumType::Sum8))
    }

    /// BenQ ASCII protocol
    pub fn benq() -> Self {
        Self::new("benq")
            .with(CommandSpec::text("on", benq::POWER_ON))
            .with(CommandSpec::text("off", benq::POWER_OFF))
            .with(CommandSpec::text("status", benq::GET_POWER).reply(ReplyKind::BenqPower))
    }

    /// Look up a built-in set by name
    pub fn builtin(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "canon" => Some(Self::canon()),
            "canon-legacy" => Some(Self::canon_legacy()),
            "benq" => Some(Self::benq()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Commands in insertion order
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Find a command by (unnormalized) name
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        let key = normalize_name(name);
        self.commands.iter().find(|c| c.name == key)
    }

    /// Resolve a command, keeping the caller's input for the error
    pub fn resolve(&self, name: &str) -> Result<&CommandSpec, UnknownCommand> {
        self.get(name).ok_or_else(|| UnknownCommand {
            input: name.to_string(),
        })
    }

    /// Encode a command name to its packet
    pub fn encode(&self, name: &str) -> Result<Packet, UnknownCommand> {
        self.resolve(name).map(CommandSpec::packet)
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::canon()
    }
}

/// Encode a command from the canonical Canon set
pub fn encode(name: &str) -> Result<Packet, UnknownCommand> {
    CommandSet::canon().encode(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canon_table() {
        let cases: &[(&str, &[u8])] = &[
            ("on", &[0x02, 0x00, 0x00, 0x00, 0x00, 0x02]),
            ("off", &[0x02, 0x01, 0x00, 0x00, 0x00, 0x03]),
            ("status", &[0x00, 0xBF, 0x00, 0x00, 0x01, 0x02, 0xC2]),
            ("showoff", &[0x02, 0x10, 0x00, 0x00, 0x00, 0x12]),
            ("showon", &[0x02, 0x11, 0x00, 0x00, 0x00, 0x13]),
        ];
        for (name, expected) in cases {
            let packet = encode(name).unwrap();
            assert_eq!(packet.as_bytes(), *expected, "command {name}");
        }
    }

    #[test]
    fn test_encode_ignores_case_and_whitespace() {
        let on = encode("on").unwrap();
        assert_eq!(encode("ON ").unwrap(), on);
        assert_eq!(encode("On").unwrap(), on);
        assert_eq!(encode("\t sHoWoN\n").unwrap(), encode("showon").unwrap());
    }

    #[test]
    fn test_unknown_command_keeps_input() {
        let err = encode("banana").unwrap_err();
        assert_eq!(err.input, "banana");

        let err = encode("  Banana ").unwrap_err();
        assert_eq!(err.input, "  Banana ");
        assert!(err.to_string().contains("Banana"));
    }

    #[test]
    fn test_legacy_set_has_no_status() {
        let set = CommandSet::builtin("canon-legacy").unwrap();
        assert_eq!(set.name(), "canon-legacy");
        assert!(set.encode("status").is_err());
        assert_eq!(set.encode("off").unwrap(), encode("off").unwrap());
        assert_eq!(set.commands().len(), 4);
    }

    #[test]
    fn test_canon_set_order_and_name() {
        let set = CommandSet::canon();
        assert_eq!(set.name(), "canon");
        let names: Vec<_> = set.commands().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["on", "off", "showoff", "showon", "status"]);
        assert_eq!(set.get("STATUS").unwrap().reply_kind(), ReplyKind::CanonStatus);
    }

    #[test]
    fn test_benq_packets_are_plain_ascii() {
        let set = CommandSet::benq();
        assert_eq!(set.encode("on").unwrap().as_bytes(), b"\r*pow=on#\r");
        assert_eq!(set.encode("off").unwrap().as_bytes(), b"\r*pow=off#\r");
        assert_eq!(set.encode("status").unwrap().as_bytes(), b"\r*pow=?#\r");
        assert!(set.encode("showon").is_err());
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut set =
            CommandSet::new("custom").with(CommandSpec::new("on", &[0x01], ChecksumType::None));
        let old = set.insert(CommandSpec::new(" ON", &[0x02], ChecksumType::None));
        assert_eq!(old.unwrap().payload(), &[0x01]);
        assert_eq!(set.commands().len(), 1);
        assert_eq!(set.encode("on").unwrap().as_bytes(), &[0x02]);
    }

    #[test]
    fn test_builtin_unknown() {
        assert!(CommandSet::builtin("sony").is_none());
        for name in BUILTIN_SETS {
            assert!(CommandSet::builtin(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_packet_display() {
        assert_eq!(encode("status").unwrap().to_string(), "00 BF 00 00 01 02 C2");
    }
}
