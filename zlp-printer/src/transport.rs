//! Endpoint-level printer transport
//!
//! Routes a payload to the right printer adapter for a [`PrinterEndpoint`].
//! A single attempt is made per call; retrying is left to the caller.

use std::future::Future;
use std::time::Duration;

use shared::models::{PrinterEndpoint, TransportKind};
use tracing::{instrument, warn};

use crate::error::PrintResult;
use crate::printer::{DEFAULT_CONNECT_TIMEOUT, NetworkPrinter, Printer, UsbPrinter};

/// Something that can deliver a label payload to an endpoint
///
/// The returned future is `Send` so transports can be driven from web
/// handlers and spawned tasks.
pub trait Transport: Send + Sync {
    /// Deliver `payload` to `endpoint`
    ///
    /// Success means the bytes were handed over; there is no confirmation
    /// that the label physically printed.
    fn send(
        &self,
        endpoint: &PrinterEndpoint,
        payload: &[u8],
    ) -> impl Future<Output = PrintResult<()>> + Send;
}

/// Transport backed by real sockets and print queues
#[derive(Debug, Clone)]
pub struct RawTransport {
    connect_timeout: Duration,
}

impl RawTransport {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set the TCP connect/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for RawTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RawTransport {
    #[instrument(skip(self, payload), fields(endpoint = %endpoint, bytes = payload.len()))]
    async fn send(&self, endpoint: &PrinterEndpoint, payload: &[u8]) -> PrintResult<()> {
        let result = match endpoint.transport {
            TransportKind::NetTcp => {
                match NetworkPrinter::resolve(&endpoint.address, endpoint.port).await {
                    Ok(printer) => printer.with_timeout(self.connect_timeout).print(payload).await,
                    Err(e) => Err(e),
                }
            }
            TransportKind::Usb => UsbPrinter::new(&endpoint.address).print(payload).await,
        };

        if let Err(e) = &result {
            warn!(error = %e, "Print job failed");
        }
        result
    }
}
