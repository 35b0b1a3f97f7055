//! Protocol constants and utilities for RS232 projector control

use crate::types::ChecksumType;

/// Serial line defaults for the projector control port
pub mod serial {
    /// Default port (USB-to-RS232 converter)
    pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
    /// Baud rate 19200 bps
    pub const DEFAULT_BAUD_RATE: u32 = 19200;
    /// A single read gives up after this long; that ends the reply
    pub const READ_TIMEOUT_MS: u64 = 100;
}

/// Canon binary command payloads (checksum byte not included)
pub mod canon {
    pub const POWER_ON: [u8; 5] = [0x02, 0x00, 0x00, 0x00, 0x00];
    pub const POWER_OFF: [u8; 5] = [0x02, 0x01, 0x00, 0x00, 0x00];
    /// Request `00 BF 00 00 01 02`, answered by a 22-byte status frame
    pub const GET_STATUS: [u8; 6] = [0x00, 0xBF, 0x00, 0x00, 0x01, 0x02];
    /// Blank the picture (shutter closed)
    pub const SHOW_OFF: [u8; 5] = [0x02, 0x10, 0x00, 0x00, 0x00];
    /// Unblank the picture
    pub const SHOW_ON: [u8; 5] = [0x02, 0x11, 0x00, 0x00, 0x00];

    /// Status reply layout
    pub mod status {
        /// `20H BFH 01H xxH 10H DATA01..DATA16 CKS`
        pub const FRAME_LEN: usize = 22;
        /// First byte of a successful reply
        pub const HEADER_SUCCESS: u8 = 0x20;

        // Power codes in DATA02 (byte 6)
        pub const POWER_IDLE: u8 = 0x00;
        /// Undocumented, seen while lamp warms up
        pub const POWER_STARTING: u8 = 0x03;
        pub const POWER_ON: u8 = 0x04;
        pub const POWER_COOLING: u8 = 0x05;
        pub const POWER_ERROR_STANDBY: u8 = 0x06;

        /// Get human-readable name for a power code
        pub fn power_name(code: u8) -> &'static str {
            match code {
                POWER_IDLE => "Idle",
                POWER_STARTING => "Starting",
                POWER_ON => "Power On",
                POWER_COOLING => "Cooling",
                POWER_ERROR_STANDBY => "Idle (Error Standby)",
                _ => "Unknown",
            }
        }
    }
}

/// BenQ ASCII commands, framed with CR on both sides
pub mod benq {
    pub const POWER_ON: &str = "\r*pow=on#\r";
    pub const POWER_OFF: &str = "\r*pow=off#\r";
    pub const GET_POWER: &str = "\r*pow=?#\r";

    pub const REPLY_ON: &str = "*POW=ON#";
    pub const REPLY_OFF: &str = "*POW=OFF#";
    /// Longest reply body that is kept
    pub const MAX_REPLY_LEN: usize = 50;
}

/// Calculate checksum over a payload
pub fn calculate_checksum(payload: &[u8], checksum_type: ChecksumType) -> Option<u8> {
    match checksum_type {
        ChecksumType::Sum8 => Some(payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))),
        ChecksumType::None => None,
    }
}

/// Build the bytes sent on the wire
///
/// Format: `[payload...] [checksum?]`
pub fn build_packet(payload: &[u8], checksum_type: ChecksumType) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + 1);
    buf.extend_from_slice(payload);
    if let Some(cks) = calculate_checksum(payload, checksum_type) {
        buf.push(cks);
    }
    buf
}

/// Format bytes as `02 01 00` for logs and listings
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
