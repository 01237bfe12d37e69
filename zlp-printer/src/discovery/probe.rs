//! Host probes used by discovery

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

/// Host identification query understood by ZPL printers
pub const STATUS_QUERY: &[u8] = b"~HI\n";

/// Substrings of an identification reply that mark a compatible printer
pub const PRINTER_MARKERS: [&str; 3] = ["Zebra", "ZPL", "HONEYWELL"];

const MAX_REPLY: usize = 1024;

/// What to conclude when the identification probe itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationPolicy {
    /// Probe failure excludes the host
    #[default]
    Strict,
    /// Probe failure includes the host (any open raw port counts)
    Permissive,
}

/// Whether a TCP connect to `addr` succeeds within `timeout`
pub async fn port_open(addr: SocketAddr, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Send the status query and return whatever the host answers
///
/// Connect and read are each bounded by `timeout`.
pub async fn identify(addr: SocketAddr, timeout: Duration) -> io::Result<String> {
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timeout"))??;

    stream.write_all(STATUS_QUERY).await?;

    let mut buf = vec![0u8; MAX_REPLY];
    let n = tokio::time::timeout(timeout, stream.read(&mut buf))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "read timeout"))??;

    Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
}

/// Whether an identification reply names a compatible printer
pub fn is_printer_reply(reply: &str) -> bool {
    PRINTER_MARKERS.iter().any(|m| reply.contains(m))
}

/// Decide whether a host with an open port is a printer
#[instrument(skip(timeout))]
pub async fn classify(addr: SocketAddr, timeout: Duration, policy: ClassificationPolicy) -> bool {
    match identify(addr, timeout).await {
        Ok(reply) => {
            let matched = is_printer_reply(&reply);
            debug!(matched, reply_len = reply.len(), "Identification reply");
            matched
        }
        Err(e) => {
            debug!(error = %e, ?policy, "Identification probe failed");
            policy == ClassificationPolicy::Permissive
        }
    }
}
