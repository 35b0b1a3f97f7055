//! Half-duplex request/response exchange
//!
//! A [`Session`] owns a channel for exactly one exchange:
//! `Idle -> Writing -> Reading(*) -> Closed`. The packet is written in one
//! call, then the reply is read one byte at a time until a read times out.
//! The channel is closed once, either when the reply ends, when a write or
//! read fails, on [`Session::close`], or when the session is dropped.

use std::fmt;

use tracing::{debug, warn};

use crate::command::Packet;
use crate::error::TransportError;
use crate::protocol;
use crate::Transport;

/// Where a session is in its single exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Writing,
    Reading,
    Closed,
}

/// Scoped owner of a channel for one exchange
pub struct Session<T: Transport> {
    channel: T,
    state: ExchangeState,
}

impl<T: Transport> Session<T> {
    /// Take ownership of an open channel
    pub fn new(channel: T) -> Self {
        Self {
            channel,
            state: ExchangeState::Idle,
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Write a packet and return its reply as a lazy byte sequence
    ///
    /// A failed write closes the channel and no read is attempted. Only one
    /// packet can be sent per session.
    pub fn send(&mut self, packet: &Packet) -> Result<Responses<'_, T>, TransportError> {
        if self.state != ExchangeState::Idle {
            return Err(TransportError::Closed);
        }

        self.state = ExchangeState::Writing;
        debug!(
            "Writing {} bytes to {}: {}",
            packet.len(),
            self.channel.info().port,
            packet
        );
        if let Err(e) = self.channel.write_all(packet.as_bytes()) {
            debug!("Write failed: {}", e);
            self.finish();
            return Err(e);
        }

        self.state = ExchangeState::Reading;
        Ok(Responses {
            session: self,
            done: false,
        })
    }

    /// Close the channel now
    ///
    /// Closing an already closed session is a no-op.
    pub fn close(&mut self) -> Result<(), TransportError> {
        if self.state == ExchangeState::Closed {
            return Ok(());
        }
        self.state = ExchangeState::Closed;
        debug!("Closing {}", self.channel.info().port);
        self.channel.close()
    }

    /// Close on the way out of an exchange; close errors are only logged
    fn finish(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close {}: {}", self.channel.info().port, e);
        }
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Lazy, single-pass reply of one exchange
///
/// Yields one byte per successful read. Ends (and closes the channel) on the
/// first timed-out read or after yielding an error.
pub struct Responses<'a, T: Transport> {
    session: &'a mut Session<T>,
    done: bool,
}

impl<T: Transport> Iterator for Responses<'_, T> {
    type Item = Result<u8, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = match self.session.channel.read(1) {
            Ok(bytes) => match bytes.as_slice() {
                [b] => return Some(Ok(*b)),
                [] => {
                    debug!("Read timed out, reply complete");
                    None
                }
                _ => Some(Err(TransportError::ReadOverrun { got: bytes.len() })),
            },
            Err(e) => Some(Err(e)),
        };

        self.done = true;
        self.session.finish();
        result
    }
}

// =============================================================================
// Collected reply
// =============================================================================

/// One reply byte, rendered as `0x41`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseByte(pub u8);

impl fmt::Display for ResponseByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// All bytes read back in one exchange, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    bytes: Vec<u8>,
}

impl Response {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ResponseByte> + '_ {
        self.bytes.iter().copied().map(ResponseByte)
    }

    /// Render every byte as `0xNN`
    pub fn hex(&self) -> Vec<String> {
        self.iter().map(|b| b.to_string()).collect()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&protocol::hex_string(&self.bytes))
    }
}

/// Run one full exchange on a channel and close it
pub fn exchange<T: Transport>(channel: T, packet: &Packet) -> Result<Response, TransportError> {
    let mut session = Session::new(channel);
    let bytes = session.send(packet)?.collect::<Result<Vec<u8>, _>>()?;
    session.close()?;
    debug!("Reply: {:02X?}", bytes);
    Ok(Response::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::encode;
    use crate::mock::{MockRead, MockTransport};

    #[test]
    fn test_immediate_timeout_gives_empty_reply() {
        let mock = MockTransport::new();
        let handle = mock.handle();

        let resp = exchange(mock, &encode("on").unwrap()).unwrap();
        assert!(resp.is_empty());
        assert_eq!(handle.writes(), vec![vec![0x02, 0x00, 0x00, 0x00, 0x00, 0x02]]);
        assert_eq!(handle.read_calls(), 1);
        assert_eq!(handle.close_calls(), 1);
    }

    #[test]
    fn test_bytes_then_timeout() {
        let mock = MockTransport::new().with_reply(&[0x41, 0x42]);
        let handle = mock.handle();

        let resp = exchange(mock, &encode("status").unwrap()).unwrap();
        assert_eq!(resp.hex(), vec!["0x41", "0x42"]);
        assert_eq!(handle.read_calls(), 3);
        assert_eq!(handle.close_calls(), 1);
    }

    #[test]
    fn test_failed_write_never_reads() {
        let mock = MockTransport::new().with_reply(&[0x06]).fail_writes();
        let handle = mock.handle();

        let err = exchange(mock, &encode("off").unwrap()).unwrap_err();
        assert!(matches!(err, TransportError::Write(_)));
        assert_eq!(handle.read_calls(), 0);
        assert_eq!(handle.close_calls(), 1);
    }

    #[test]
    fn test_overrun_is_read_error() {
        let mock = MockTransport::new().with_read(MockRead::Bytes(vec![0x01, 0x02]));
        let handle = mock.handle();

        let err = exchange(mock, &encode("on").unwrap()).unwrap_err();
        assert!(matches!(err, TransportError::ReadOverrun { got: 2 }));
        assert_eq!(handle.close_calls(), 1);
    }

    #[test]
    fn test_read_error_after_bytes() {
        let mock = MockTransport::new()
            .with_reply(&[0x20])
            .with_read(MockRead::Error("line broke".into()));
        let handle = mock.handle();

        let mut session = Session::new(mock);
        let items: Vec<_> = session.send(&encode("status").unwrap()).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(*items[0].as_ref().unwrap(), 0x20);
        assert!(matches!(items[1], Err(TransportError::Read(_))));
        assert_eq!(session.state(), ExchangeState::Closed);
        drop(session);
        assert_eq!(handle.close_calls(), 1);
    }

    #[test]
    fn test_state_transitions() {
        let mock = MockTransport::new().with_reply(&[0x06]);
        let mut session = Session::new(mock);
        assert_eq!(session.state(), ExchangeState::Idle);

        let packet = encode("off").unwrap();
        let mut reply = session.send(&packet).unwrap();
        assert_eq!(reply.next().unwrap().unwrap(), 0x06);
        assert!(reply.next().is_none());
        assert!(reply.next().is_none());
        assert_eq!(session.state(), ExchangeState::Closed);
    }

    #[test]
    fn test_second_send_rejected() {
        let mock = MockTransport::new();
        let handle = mock.handle();
        let mut session = Session::new(mock);
        let packet = encode("on").unwrap();

        assert_eq!(session.send(&packet).unwrap().count(), 0);
        assert!(matches!(session.send(&packet), Err(TransportError::Closed)));
        assert_eq!(handle.writes().len(), 1);
    }

    #[test]
    fn test_drop_closes_unsent_session() {
        let mock = MockTransport::new();
        let handle = mock.handle();
        {
            let session = Session::new(mock);
            assert_eq!(session.state(), ExchangeState::Idle);
        }
        assert_eq!(handle.close_calls(), 1);
        assert!(handle.writes().is_empty());
    }

    #[test]
    fn test_partial_read_then_drop_closes_once() {
        let mock = MockTransport::new().with_reply(&[0x01, 0x02, 0x03]);
        let handle = mock.handle();
        {
            let mut session = Session::new(mock);
            let packet = encode("status").unwrap();
            let first = session.send(&packet).unwrap().next();
            assert_eq!(first.unwrap().unwrap(), 0x01);
            assert_eq!(session.state(), ExchangeState::Reading);
        }
        assert_eq!(handle.read_calls(), 1);
        assert_eq!(handle.close_calls(), 1);
    }

    #[test]
    fn test_response_rendering() {
        let resp = Response::new(vec![0x06, 0xBF]);
        assert_eq!(resp.hex(), vec!["0x06", "0xBF"]);
        assert_eq!(resp.to_string(), "06 BF");
        assert_eq!(ResponseByte(0x0A).to_string(), "0x0A");
    }
}
