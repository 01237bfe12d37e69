//! Printer Endpoint Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw printing port of Zebra-compatible network printers
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// Physical connection method of a printer
///
/// Serialized with the labels used in the settings file (`"NET/TCP"`, `"USB"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransportKind {
    /// Raw TCP socket
    #[default]
    #[serde(rename = "NET/TCP")]
    NetTcp,
    /// OS print queue (driver), addressed by queue name
    #[serde(rename = "USB")]
    Usb,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::NetTcp => "NET/TCP",
            TransportKind::Usb => "USB",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Printing device address
///
/// Created from the settings file or by network discovery and never mutated
/// afterwards. For [`TransportKind::Usb`] the `address` is the OS print queue
/// name and `port` is unused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrinterEndpoint {
    pub address: String,
    pub port: u16,
    pub transport: TransportKind,
}

impl PrinterEndpoint {
    /// Network printer reached over raw TCP
    pub fn network(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            transport: TransportKind::NetTcp,
        }
    }

    /// Printer behind an OS print queue
    pub fn usb(queue: impl Into<String>) -> Self {
        Self {
            address: queue.into(),
            port: 0,
            transport: TransportKind::Usb,
        }
    }
}

impl fmt::Display for PrinterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.transport {
            TransportKind::NetTcp => write!(f, "{}:{}", self.address, self.port),
            TransportKind::Usb => write!(f, "usb:{}", self.address),
        }
    }
}
