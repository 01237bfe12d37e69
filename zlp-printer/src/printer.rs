//! Printer adapters for sending ZPL data
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - USB printers behind a Windows print queue (RAW spooler job)

use crate::error::{PrintError, PrintResult};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

/// Default connect timeout for print jobs
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw label data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (raw TCP)
///
/// Zebra printers accept a ZPL format written directly to port 9100. Each
/// print opens a fresh connection and closes it when the payload is written.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer from an IP address and port
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let ip: IpAddr = host
            .trim()
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", host)))?;

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Create from an IP address or a host name
    ///
    /// Host names go through the system resolver; an IPv4 result wins over
    /// IPv6 since most label printers only listen on IPv4.
    pub async fn resolve(host: &str, port: u16) -> PrintResult<Self> {
        if let Ok(printer) = Self::new(host, port) {
            return Ok(printer);
        }
        let host = host.trim();
        if host.is_empty() {
            return Err(PrintError::InvalidConfig("Empty printer address".to_string()));
        }

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| PrintError::Connection(format!("Cannot resolve {}: {}", host, e)))?
            .collect();
        let addr = addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| PrintError::Connection(format!("No address for {}", host)))?;
        debug!(host, %addr, "Resolved printer host");

        Ok(Self {
            addr,
            timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        let write = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            stream.shutdown().await
        };

        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.addr)))?
            .map_err(|e| {
                PrintError::Io(std::io::Error::new(e.kind(), format!("Write failed: {}", e)))
            })?;

        info!("Label data sent");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// USB printer behind an OS print queue
///
/// Jobs are submitted as RAW documents so the ZPL reaches the printer
/// untouched. Only Windows has a spooler backend; elsewhere every print
/// fails with [`PrintError::Unsupported`].
#[derive(Debug, Clone)]
pub struct UsbPrinter {
    queue: String,
}

impl UsbPrinter {
    /// Create a printer for a named print queue
    pub fn new(queue: &str) -> Self {
        Self {
            queue: queue.to_string(),
        }
    }

    /// Get the queue name
    pub fn queue(&self) -> &str {
        &self.queue
    }

    #[cfg(windows)]
    fn write_raw(&self, data: &[u8]) -> PrintResult<()> {
        use core::ffi::c_void;
        use windows::Win32::Graphics::Printing::{
            ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
            StartDocPrinterW, StartPagePrinter, WritePrinter,
        };
        use windows::core::{PCWSTR, PWSTR};

        let name_w = to_wide(&self.queue);
        let doc_name_w = to_wide("ZPL Label");
        let datatype_w = to_wide("RAW");

        unsafe {
            let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
            OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
                .map_err(|_| PrintError::Offline(self.queue.clone()))?;

            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
            };

            if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                let _ = ClosePrinter(handle);
                return Err(PrintError::WindowsPrinter(
                    "StartDocPrinter failed".to_string(),
                ));
            }

            if !StartPagePrinter(handle).as_bool() {
                let _ = EndDocPrinter(handle);
                let _ = ClosePrinter(handle);
                return Err(PrintError::WindowsPrinter(
                    "StartPagePrinter failed".to_string(),
                ));
            }

            let mut written: u32 = 0;
            let ok = WritePrinter(
                handle,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            );

            let _ = EndPagePrinter(handle);
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);

            if !ok.as_bool() {
                return Err(PrintError::WindowsPrinter(
                    "WritePrinter failed".to_string(),
                ));
            }

            if written != data.len() as u32 {
                return Err(PrintError::WindowsPrinter("Incomplete write".to_string()));
            }

            Ok(())
        }
    }

    #[cfg(not(windows))]
    fn write_raw(&self, _data: &[u8]) -> PrintResult<()> {
        Err(PrintError::Unsupported(
            "USB queue printing is only available on Windows".to_string(),
        ))
    }

    #[cfg(windows)]
    fn queue_exists(&self) -> bool {
        use windows::Win32::Graphics::Printing::{ClosePrinter, OpenPrinterW, PRINTER_HANDLE};
        use windows::core::PCWSTR;

        let name_w = to_wide(&self.queue);
        unsafe {
            let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
            if OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None).is_err() {
                return false;
            }
            let _ = ClosePrinter(handle);
            true
        }
    }

    #[cfg(not(windows))]
    fn queue_exists(&self) -> bool {
        false
    }
}

#[cfg(windows)]
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

impl Printer for UsbPrinter {
    #[instrument(skip(self, data), fields(queue = %self.queue, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        if self.queue.is_empty() {
            return Err(PrintError::InvalidConfig("No USB printer selected".to_string()));
        }

        // Spooler calls are blocking
        let printer = self.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || printer.write_raw(&data))
            .await
            .map_err(|e| PrintError::Io(std::io::Error::other(format!("Task join failed: {}", e))))?
    }

    async fn is_online(&self) -> bool {
        self.queue_exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_network_printer_ipv6() {
        let printer = NetworkPrinter::new("::1", 9100).unwrap();
        assert!(printer.addr().is_ipv6());
    }

    #[test]
    fn test_network_printer_from_addr() {
        let printer = NetworkPrinter::from_addr("192.168.1.100:9100").unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_invalid_addr() {
        assert!(NetworkPrinter::from_addr("invalid").is_err());
        assert!(NetworkPrinter::new("printer.local", 9100).is_err());
    }

    #[tokio::test]
    async fn test_resolve_keeps_ip_literal() {
        let printer = NetworkPrinter::resolve(" 10.1.2.3 ", 9100).await.unwrap();
        assert_eq!(printer.addr(), "10.1.2.3:9100".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_host_name() {
        let printer = NetworkPrinter::resolve("localhost", 9100).await.unwrap();
        assert!(printer.addr().ip().is_loopback());
        assert_eq!(printer.addr().port(), 9100);
    }

    #[tokio::test]
    async fn test_resolve_empty_is_config_error() {
        assert!(matches!(
            NetworkPrinter::resolve("  ", 9100).await,
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[cfg(not(windows))]
    #[tokio::test]
    async fn test_usb_unsupported_off_windows() {
        let printer = UsbPrinter::new("ZDesigner");
        assert!(matches!(
            printer.print(b"^XA^XZ").await,
            Err(PrintError::Unsupported(_))
        ));
        assert!(!printer.is_online().await);
    }

    #[tokio::test]
    async fn test_usb_without_queue_name() {
        let printer = UsbPrinter::new("");
        assert!(matches!(
            printer.print(b"^XA^XZ").await,
            Err(PrintError::InvalidConfig(_))
        ));
    }
}
