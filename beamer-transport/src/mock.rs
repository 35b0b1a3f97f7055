//! Scripted transport for testing without hardware.
//!
//! [`MockTransport`] replays a queue of read results and records every write.
//! Once the queue is exhausted each read times out, which ends a reply. The
//! transport is moved into a [`Session`](crate::Session), so observations go
//! through a cloned [`MockHandle`].
//!
//! ```
//! use beamer_transport::{exchange, encode, MockTransport};
//!
//! let mock = MockTransport::new().with_reply(&[0x06]);
//! let handle = mock.handle();
//! let reply = exchange(mock, &encode("off").unwrap()).unwrap();
//! assert_eq!(reply.hex(), vec!["0x06"]);
//! assert_eq!(handle.close_calls(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::TransportError;
use crate::types::{SerialSettings, TransportInfo};
use crate::Transport;

/// One scripted read result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRead {
    /// Return these bytes (a single byte for a well-behaved port)
    Bytes(Vec<u8>),
    /// Return nothing, as a timed-out read does
    Timeout,
    /// Fail with `TransportError::Read`
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    reads: VecDeque<MockRead>,
    fail_writes: bool,
    writes: Vec<Vec<u8>>,
    read_calls: usize,
    close_calls: usize,
}

/// A [`Transport`] with pre-loaded read results.
#[derive(Debug)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    info: TransportInfo,
}

impl MockTransport {
    /// Create a mock whose reads time out immediately
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            info: TransportInfo {
                port: "mock".into(),
                settings: SerialSettings::default(),
            },
        }
    }

    /// Queue a reply, delivered one byte per read
    pub fn with_reply(self, bytes: &[u8]) -> Self {
        {
            let mut state = self.lock();
            state
                .reads
                .extend(bytes.iter().map(|&b| MockRead::Bytes(vec![b])));
        }
        self
    }

    /// Queue a single read result
    pub fn with_read(self, read: MockRead) -> Self {
        self.lock().reads.push_back(read);
        self
    }

    /// Make every write fail
    pub fn fail_writes(self) -> Self {
        self.lock().fail_writes = true;
        self
    }

    /// Get a handle for inspecting traffic after the mock has been moved
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut state = self.lock();
        if state.close_calls > 0 {
            return Err(TransportError::Closed);
        }
        if state.fail_writes {
            return Err(TransportError::Write("mock write failure".into()));
        }
        state.writes.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, _max: usize) -> Result<Vec<u8>, TransportError> {
        let mut state = self.lock();
        if state.close_calls > 0 {
            return Err(TransportError::Closed);
        }
        state.read_calls += 1;
        match state.reads.pop_front() {
            Some(MockRead::Bytes(bytes)) => Ok(bytes),
            Some(MockRead::Timeout) | None => Ok(Vec::new()),
            Some(MockRead::Error(msg)) => Err(TransportError::Read(msg)),
        }
    }

    fn info(&self) -> &TransportInfo {
        &self.info
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.lock().close_calls += 1;
        Ok(())
    }
}

/// Shared view of a [`MockTransport`]'s recorded traffic
#[derive(Debug, Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Each `write_all` call's data, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    pub fn read_calls(&self) -> usize {
        self.lock().read_calls
    }

    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    /// Scripted reads that were never consumed
    pub fn pending_reads(&self) -> usize {
        self.lock().reads.len()
    }
}
