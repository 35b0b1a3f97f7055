//! Common types for transport layer

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::serial;

/// Checksum configuration for command packets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecksumType {
    /// Append the low byte of the payload sum (Canon style)
    #[default]
    Sum8,
    /// Send the payload unchanged
    None,
}

/// How the reply to a command can be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplyKind {
    /// Opaque bytes, no decoding
    #[default]
    Raw,
    /// 22-byte Canon status frame
    CanonStatus,
    /// ASCII `*POW=..#` answer
    BenqPower,
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// Serial line configuration.
///
/// Defaults match the projector's RS232 control port:
/// 19200 baud, 8 data bits, no parity, 1 stop bit, 100ms read timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// Upper bound for a single read; a read that times out ends the reply
    pub read_timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: serial::DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: Duration::from_millis(serial::READ_TIMEOUT_MS),
        }
    }
}

impl SerialSettings {
    /// Override the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Override the per-read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }
}

/// Conventional short form, e.g. `19200 8N1`
impl fmt::Display for SerialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data_bits = match self.data_bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        let stop_bits = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        write!(f, "{} {data_bits}{parity}{stop_bits}", self.baud_rate)
    }
}

/// Identification of an open channel
#[derive(Debug, Clone)]
pub struct TransportInfo {
    /// Device path or other port identifier
    pub port: String,
    /// Line settings the port was opened with
    pub settings: SerialSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_projector_port() {
        let s = SerialSettings::default();
        assert_eq!(s.baud_rate, 19200);
        assert_eq!(s.data_bits, DataBits::Eight);
        assert_eq!(s.parity, Parity::None);
        assert_eq!(s.stop_bits, StopBits::One);
        assert_eq!(s.read_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ChecksumType::default(), ChecksumType::Sum8);
        assert_eq!(ReplyKind::default(), ReplyKind::Raw);
    }

    #[test]
    fn test_builder_overrides() {
        let s = SerialSettings::default()
            .with_baud_rate(9600)
            .with_read_timeout(Duration::from_millis(250));
        assert_eq!(s.baud_rate, 9600);
        assert_eq!(s.read_timeout, Duration::from_millis(250));
        assert_eq!(s.parity, Parity::None);
    }

    #[test]
    fn test_line_settings_display() {
        assert_eq!(SerialSettings::default().to_string(), "19200 8N1");

        let s = SerialSettings::default()
            .with_baud_rate(9600)
            .with_data_bits(DataBits::Seven)
            .with_parity(Parity::Even)
            .with_stop_bits(StopBits::Two);
        assert_eq!(s.to_string(), "9600 7E2");

        let s = SerialSettings::default()
            .with_data_bits(DataBits::Five)
            .with_parity(Parity::Odd);
        assert_eq!(s.to_string(), "19200 5O1");
    }
}
