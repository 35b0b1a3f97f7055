//! PrinterTransport middleware for monitoring transport traffic
//!
//! Wraps any [`Transport`] and reports every write, read and close passing
//! through it, without altering the data.
//!
//! # Example
//!
//! ```ignore
//! use beamer_transport::{PrinterConfig, PrinterTransport, SerialTransport};
//!
//! let port = SerialTransport::open("/dev/ttyUSB0", &Default::default())?;
//! let monitored = PrinterTransport::wrap(port, PrinterConfig::default());
//! // Now all traffic is printed to stderr
//! ```

use std::io::Write;
use std::time::Instant;

use tracing::trace;

use crate::error::TransportError;
use crate::protocol;
use crate::types::TransportInfo;
use crate::Transport;

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Also report reads that timed out
    pub show_timeouts: bool,
}

impl PrinterConfig {
    pub fn with_timeouts(mut self, show: bool) -> Self {
        self.show_timeouts = show;
        self
    }
}

/// Transport middleware that prints all traffic
pub struct PrinterTransport<T: Transport, W: Write = std::io::Stderr> {
    inner: T,
    config: PrinterConfig,
    out: W,
    start: Instant,
}

impl<T: Transport> PrinterTransport<T> {
    /// Wrap a transport, printing to stderr
    pub fn wrap(inner: T, config: PrinterConfig) -> Self {
        Self::with_writer(inner, config, std::io::stderr())
    }
}

impl<T: Transport, W: Write> PrinterTransport<T, W> {
    /// Wrap a transport, printing to `out`
    pub fn with_writer(inner: T, config: PrinterConfig, out: W) -> Self {
        Self {
            inner,
            config,
            out,
            start: Instant::now(),
        }
    }

    /// Unwrap into the inner transport and writer
    pub fn into_parts(self) -> (T, W) {
        (self.inner, self.out)
    }

    fn print(&mut self, direction: &str, detail: &str) {
        let elapsed = self.start.elapsed().as_secs_f64() * 1000.0;
        // Monitoring output is best effort
        if let Err(e) = writeln!(self.out, "[{elapsed:8.1}ms] {direction:<5} {detail}") {
            trace!("monitor write failed: {}", e);
        }
    }
}

impl<T: Transport, W: Write> Transport for PrinterTransport<T, W> {
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let result = self.inner.write_all(data);
        let detail = match &result {
            Ok(()) => protocol::hex_string(data),
            Err(e) => format!("{} (failed: {e})", protocol::hex_string(data)),
        };
        self.print("TX", &detail);
        result
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>, TransportError> {
        let result = self.inner.read(max);
        match &result {
            Ok(bytes) if bytes.is_empty() => {
                if self.config.show_timeouts {
                    self.print("RX", "(timeout)");
                }
            }
            Ok(bytes) => {
                let detail = protocol::hex_string(bytes);
                self.print("RX", &detail);
            }
            Err(e) => {
                let detail = format!("error: {e}");
                self.print("RX", &detail);
            }
        }
        result
    }

    fn info(&self) -> &TransportInfo {
        self.inner.info()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let result = self.inner.close();
        let port = self.inner.info().port.clone();
        self.print("CLOSE", &port);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::encode;
    use crate::exchange::exchange;
    use crate::mock::MockTransport;

    /// Writer that can be inspected after the printer is consumed
    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn lines(buf: &SharedBuf) -> Vec<String> {
        String::from_utf8(buf.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| l.split_once("] ").unwrap().1.to_string())
            .collect()
    }

    #[test]
    fn test_prints_traffic() {
        let mock = MockTransport::new().with_reply(&[0x06]);
        let handle = mock.handle();
        let out = SharedBuf::default();
        let printer = PrinterTransport::with_writer(mock, PrinterConfig::default(), out.clone());

        let resp = exchange(printer, &encode("off").unwrap()).unwrap();
        assert_eq!(resp.as_bytes(), &[0x06]);
        assert_eq!(
            lines(&out),
            vec![
                "TX    02 01 00 00 00 03".to_string(),
                "RX    06".to_string(),
                "CLOSE mock".to_string(),
            ]
        );
        assert_eq!(handle.close_calls(), 1);
    }

    #[test]
    fn test_prints_timeouts_when_enabled() {
        let out = SharedBuf::default();
        let printer = PrinterTransport::with_writer(
            MockTransport::new(),
            PrinterConfig::default().with_timeouts(true),
            out.clone(),
        );

        exchange(printer, &encode("on").unwrap()).unwrap();
        assert!(lines(&out).contains(&"RX    (timeout)".to_string()));
    }

    #[test]
    fn test_passes_data_through_unchanged() {
        let mock = MockTransport::new().with_reply(&[0x06, 0x41]);
        let mut printer = PrinterTransport::with_writer(mock, PrinterConfig::default(), Vec::new());

        printer.write_all(&[0x02, 0x00]).unwrap();
        assert_eq!(printer.read(1).unwrap(), vec![0x06]);
        assert_eq!(printer.read(1).unwrap(), vec![0x41]);
        assert!(printer.read(1).unwrap().is_empty());

        let (inner, out) = printer.into_parts();
        assert_eq!(inner.handle().writes(), vec![vec![0x02, 0x00]]);
        assert_eq!(inner.handle().close_calls(), 0);

        // Timeouts are hidden by default
        let text = String::from_utf8(out).unwrap();
        let directions: Vec<&str> = text
            .lines()
            .map(|l| l.split_once("] ").unwrap().1)
            .collect();
        assert_eq!(directions, vec!["TX    02 00", "RX    06", "RX    41"]);
    }
}
