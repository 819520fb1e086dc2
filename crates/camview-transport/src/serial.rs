use std::io::{ErrorKind, Read};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Default port the camera bridge enumerates as.
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM22";
/// Default port the camera bridge enumerates as.
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default line rate. The OV7670 bridge firmware streams at 4 Mbaud.
pub const DEFAULT_BAUD_RATE: u32 = 4_000_000;

/// Default read timeout for one frame.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Serial connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port identifier (`COM22`, `/dev/ttyUSB0`, ...).
    pub port: String,
    /// Line rate in baud.
    pub baud_rate: u32,
    /// How long a read may block before returning what it has.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// Create a config for `port` with the default rate and timeout.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// Reject parameters no serial driver accepts.
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(TransportError::InvalidConfig(
                "port name must not be empty".to_string(),
            ));
        }
        if self.baud_rate == 0 {
            return Err(TransportError::InvalidConfig(
                "baud rate must be greater than zero".to_string(),
            ));
        }
        if self.read_timeout.is_zero() {
            return Err(TransportError::InvalidConfig(
                "read timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Serial port transport (8N1, no flow control).
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    name: String,
}

impl SerialTransport {
    /// Open the configured port (blocking).
    pub fn open(config: &SerialConfig) -> Result<Self> {
        config.validate()?;

        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: config.port.clone(),
                source,
            })?;

        info!(
            port = %config.port,
            baud = config.baud_rate,
            timeout_ms = config.read_timeout.as_millis() as u64,
            "opened serial port"
        );

        Ok(Self {
            port: Some(port),
            name: config.port.clone(),
        })
    }
}

impl Read for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.port {
            Some(port) => port.read(buf),
            None => Err(std::io::Error::new(
                ErrorKind::NotConnected,
                "serial port closed",
            )),
        }
    }
}

impl Transport for SerialTransport {
    fn describe(&self) -> &str {
        &self.name
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!(port = %self.name, "closed serial port");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.port.is_none()
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        let port = self.port.as_mut().ok_or(TransportError::Closed)?;
        port.set_timeout(timeout).map_err(|err| TransportError::Io(err.into()))
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port", &self.name)
            .field("open", &self.port.is_some())
            .finish()
    }
}

/// Bus a serial port hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    Usb,
    Pci,
    Bluetooth,
    Unknown,
}

impl PortKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PortKind::Usb => "usb",
            PortKind::Pci => "pci",
            PortKind::Bluetooth => "bluetooth",
            PortKind::Unknown => "unknown",
        }
    }
}

/// One enumerated serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    pub kind: PortKind,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

impl PortSummary {
    fn from_info(info: serialport::SerialPortInfo) -> Self {
        let mut summary = Self {
            name: info.port_name,
            kind: PortKind::Unknown,
            vid: None,
            pid: None,
            manufacturer: None,
            product: None,
            serial_number: None,
        };

        match info.port_type {
            SerialPortType::UsbPort(usb) => {
                summary.kind = PortKind::Usb;
                summary.vid = Some(usb.vid);
                summary.pid = Some(usb.pid);
                summary.manufacturer = usb.manufacturer;
                summary.product = usb.product;
                summary.serial_number = usb.serial_number;
            }
            SerialPortType::PciPort => summary.kind = PortKind::Pci,
            SerialPortType::BluetoothPort => summary.kind = PortKind::Bluetooth,
            SerialPortType::Unknown => {}
        }

        summary
    }
}

/// List the serial ports the OS currently exposes, sorted by name.
pub fn available_ports() -> Result<Vec<PortSummary>> {
    let mut ports: Vec<PortSummary> = serialport::available_ports()
        .map_err(TransportError::Enumerate)?
        .into_iter()
        .map(PortSummary::from_info)
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports)
}
