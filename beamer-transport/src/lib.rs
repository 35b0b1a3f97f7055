//! Transport and command codec for RS232-controlled projectors
//!
//! This crate provides the pieces needed to drive a projector or screen over
//! a serial line:
//!
//! - Command sets and packet encoding (`command`, `protocol`)
//! - The [`Transport`] byte channel and its serial backend
//! - A half-duplex exchange driver with scoped channel ownership (`exchange`)
//! - Reply decoders for status queries (`response`)
//! - A monitoring middleware and a scripted mock transport

pub mod command;
pub mod error;
pub mod exchange;
pub mod mock;
pub mod printer;
pub mod protocol;
pub mod response;
pub mod types;

mod serial;

pub use command::{encode, normalize_name, CommandSet, CommandSpec, Packet, BUILTIN_SETS};
pub use error::{TransportError, UnknownCommand};
pub use exchange::{exchange, ExchangeState, Response, ResponseByte, Responses, Session};
pub use mock::{MockHandle, MockRead, MockTransport};
pub use printer::{PrinterConfig, PrinterTransport};
pub use response::{decode_reply, CanonStatusFrame, ParseError, PowerState};
pub use serial::{available_ports, PortInfo, SerialTransport};
pub use types::{ChecksumType, DataBits, Parity, ReplyKind, SerialSettings, StopBits, TransportInfo};

/// Blocking byte channel to a device
///
/// Implementations deal with the physical link only; framing and
/// request/response sequencing live in [`exchange`].
pub trait Transport {
    /// Write all bytes or fail
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Read up to `max` bytes, waiting at most the configured read timeout
    ///
    /// # Returns
    /// The bytes read; an empty vector means the read timed out
    fn read(&mut self, max: usize) -> Result<Vec<u8>, TransportError>;

    /// Get port information
    fn info(&self) -> &TransportInfo;

    /// Release the underlying port
    fn close(&mut self) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).write_all(data)
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>, TransportError> {
        (**self).read(max)
    }

    fn info(&self) -> &TransportInfo {
        (**self).info()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;
