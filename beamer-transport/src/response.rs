//! Reply decoders
//!
//! The exchange driver hands back raw bytes. Commands whose [`ReplyKind`] is
//! not `Raw` can be decoded into a [`PowerState`] with [`decode_reply`].

use std::fmt;

use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::protocol::{benq, canon::status};
use crate::types::ReplyKind;

/// Parse error for replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooShort { expected: usize, got: usize },
    /// Device answered but not with a success header
    NotSuccess { header: u8 },
    ChecksumMismatch { expected: u8, got: u8 },
    /// Reply kind has nothing to decode
    NotDecodable,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected, got } => {
                write!(f, "Reply too short: expected {expected} bytes, got {got}")
            }
            Self::NotSuccess { header } => {
                write!(f, "No success response (header 0x{header:02X})")
            }
            Self::ChecksumMismatch { expected, got } => write!(
                f,
                "Checksum mismatch: computed 0x{expected:02X}, last byte 0x{got:02X}"
            ),
            Self::NotDecodable => f.write_str("Reply is not decodable"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Projector power state as far as it can be told from a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum PowerState {
    On,
    Off,
    Unknown,
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PowerState::On => "On",
            PowerState::Off => "Off",
            PowerState::Unknown => "Unknown",
        })
    }
}

// =============================================================================
// Canon status frame
// =============================================================================

/// 22-byte Canon status reply: `20H BFH 01H xxH 10H DATA01..DATA16 CKS`
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CanonStatusFrame {
    header: u8,
    command: u8,
    _b2: u8,
    _b3: u8,
    data_len: u8,
    data: [u8; 16],
    checksum: u8,
}

impl CanonStatusFrame {
    /// Validate and view the first 22 bytes of a reply
    ///
    /// Trailing bytes beyond the frame are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() < status::FRAME_LEN {
            return Err(ParseError::TooShort {
                expected: status::FRAME_LEN,
                got: bytes.len(),
            });
        }
        let frame_bytes = &bytes[..status::FRAME_LEN];
        let frame = Self::read_from_bytes(frame_bytes).map_err(|_| ParseError::TooShort {
            expected: status::FRAME_LEN,
            got: bytes.len(),
        })?;

        if frame.header != status::HEADER_SUCCESS {
            return Err(ParseError::NotSuccess {
                header: frame.header,
            });
        }

        let computed = frame_bytes[..status::FRAME_LEN - 1]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_add(b));
        if computed != frame.checksum {
            return Err(ParseError::ChecksumMismatch {
                expected: computed,
                got: frame.checksum,
            });
        }
        Ok(frame)
    }

    /// Raw power code (DATA02)
    pub fn power_code(&self) -> u8 {
        self.data[1]
    }

    pub fn command(&self) -> u8 {
        self.command
    }

    pub fn data_len(&self) -> u8 {
        self.data_len
    }

    pub fn data(&self) -> &[u8; 16] {
        &self.data
    }

    /// Map the power code; warm-up and cool-down count as on
    pub fn power_state(&self) -> PowerState {
        match self.power_code() {
            status::POWER_IDLE | status::POWER_ERROR_STANDBY => PowerState::Off,
            status::POWER_STARTING | status::POWER_ON | status::POWER_COOLING => PowerState::On,
            _ => PowerState::Unknown,
        }
    }
}

// =============================================================================
// BenQ power reply
// =============================================================================

/// Extract the BenQ reply body: everything after the first LF, without CR
///
/// The projector echoes the request before answering, the echo ends at LF.
pub fn benq_reply_body(bytes: &[u8]) -> String {
    let mut body = String::new();
    let mut started = false;
    for &b in bytes {
        match b {
            b'\n' => started = true,
            b'\r' => {}
            _ if started && body.len() < benq::MAX_REPLY_LEN => body.push(b as char),
            _ => {}
        }
    }
    body
}

/// Decode a BenQ `*POW=..#` reply
pub fn parse_benq_power(bytes: &[u8]) -> PowerState {
    match benq_reply_body(bytes).as_str() {
        benq::REPLY_ON => PowerState::On,
        benq::REPLY_OFF => PowerState::Off,
        _ => PowerState::Unknown,
    }
}

/// Decode a reply according to the command's reply kind
pub fn decode_reply(kind: ReplyKind, bytes: &[u8]) -> Result<PowerState, ParseError> {
    match kind {
        ReplyKind::Raw => Err(ParseError::NotDecodable),
        ReplyKind::CanonStatus => CanonStatusFrame::parse(bytes).map(|f| f.power_state()),
        ReplyKind::BenqPower => Ok(parse_benq_power(bytes)),
    }
}
