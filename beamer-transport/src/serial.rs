//! Serial port transport implementation
//!
//! Thin wrapper over the `serialport` crate. The port is opened with the
//! configured read timeout, so a read that sees no data returns an empty
//! buffer instead of blocking.

use std::io::{self, Read, Write};

use serialport::{SerialPort, SerialPortType};
use tracing::{debug, info};

use crate::error::TransportError;
use crate::types::{SerialSettings, TransportInfo};
use crate::Transport;

/// Transport for a USB-to-RS232 adapter or native serial port
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    info: TransportInfo,
}

impl SerialTransport {
    /// Open and configure a serial port
    ///
    /// # Arguments
    /// * `path` - Platform port identifier (e.g. `/dev/ttyUSB0`, `COM3`)
    /// * `settings` - Line settings and read timeout
    pub fn open(path: &str, settings: &SerialSettings) -> Result<Self, TransportError> {
        let port = serialport::new(path, settings.baud_rate)
            .data_bits(settings.data_bits.into())
            .parity(settings.parity.into())
            .stop_bits(settings.stop_bits.into())
            .flow_control(serialport::FlowControl::None)
            .timeout(settings.read_timeout)
            .open()
            .map_err(|e| TransportError::open(path, e))?;

        info!(
            "Opened {} at {} ({} ms read timeout)",
            path,
            settings,
            settings.read_timeout.as_millis()
        );

        Ok(Self {
            port: Some(port),
            info: TransportInfo {
                port: path.to_string(),
                settings: settings.clone(),
            },
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>, TransportError> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let port = self.port_mut()?;
        Write::write_all(port, data)
            .and_then(|_| Write::flush(port))
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>, TransportError> {
        let port = self.port_mut()?;
        let mut buf = vec![0u8; max];
        match Read::read(port, &mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(TransportError::Read(e.to_string())),
        }
    }

    fn info(&self) -> &TransportInfo {
        &self.info
    }

    fn close(&mut self) -> Result<(), TransportError> {
        match self.port.take() {
            Some(port) => {
                drop(port);
                debug!("Closed {}", self.info.port);
                Ok(())
            }
            None => Err(TransportError::Closed),
        }
    }
}

/// A serial port found on the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    /// Human-readable adapter description
    pub description: String,
}

/// List serial ports available on this machine
pub fn available_ports() -> Result<Vec<PortInfo>, TransportError> {
    let ports =
        serialport::available_ports().map_err(|e| TransportError::Enumerate(e.description))?;

    Ok(ports
        .into_iter()
        .map(|p| PortInfo {
            description: describe_port_type(&p.port_type),
            name: p.port_name,
        })
        .collect())
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let mut s = format!("USB {:04X}:{:04X}", usb.vid, usb.pid);
            if let Some(product) = &usb.product {
                s.push(' ');
                s.push_str(product);
            } else if let Some(manufacturer) = &usb.manufacturer {
                s.push(' ');
                s.push_str(manufacturer);
            }
            s
        }
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    }
}
