//! Network printer discovery
//!
//! Enumerates the local IPv4 subnets, probes every host for an open raw
//! printing port and keeps the hosts that identify as ZPL printers.
//!
//! The scan reports back over a channel of [`ScanEvent`]s and stops at the
//! next host boundary once its [`CancellationToken`] fires, returning what
//! it found so far.
//!
//! ```ignore
//! let mut handle = Scanner::new(ScanOptions::default()).spawn();
//! while let Some(event) = handle.next_event().await {
//!     match event {
//!         ScanEvent::Progress(text) => println!("{text}"),
//!         ScanEvent::Found(endpoint) => println!("found {endpoint}"),
//!         ScanEvent::Finished(result) => break,
//!     }
//! }
//! ```

mod probe;
mod subnet;

pub use probe::{ClassificationPolicy, PRINTER_MARKERS, STATUS_QUERY, classify, identify, is_printer_reply, port_open};
pub use subnet::{Subnet, lan_address, local_subnets};

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use futures::StreamExt;
use serde::Serialize;
use shared::models::{DEFAULT_PRINTER_PORT, PrinterEndpoint};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Discovery settings
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Raw printing port to probe
    pub port: u16,
    /// Per-host connect and read timeout
    pub timeout: Duration,
    /// Hosts probed at the same time
    pub concurrency: usize,
    /// Smallest prefix length scanned (/23 = 512 addresses)
    pub min_prefix_len: u8,
    pub policy: ClassificationPolicy,
    /// Scan these subnets instead of the local interfaces
    pub subnets: Option<Vec<Subnet>>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PRINTER_PORT,
            timeout: Duration::from_millis(300),
            concurrency: 32,
            min_prefix_len: 23,
            policy: ClassificationPolicy::Strict,
            subnets: None,
        }
    }
}

/// Outcome of a scan, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub printers: Vec<PrinterEndpoint>,
    /// The scan stopped early; `printers` is partial
    pub cancelled: bool,
}

/// Incremental scan output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Human-readable status line
    Progress(String),
    /// A printer was found
    Found(PrinterEndpoint),
    /// The scan ended (completed or cancelled)
    Finished(ScanResult),
}

type EventSender = mpsc::UnboundedSender<ScanEvent>;

/// Network printer scanner
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Subnets this scan will walk, in order
    pub fn target_subnets(&self) -> Vec<Subnet> {
        match &self.options.subnets {
            Some(subnets) => subnets.clone(),
            None => local_subnets(self.options.min_prefix_len),
        }
    }

    /// Run the scan to completion or cancellation
    ///
    /// Subnets are walked in order and hosts in ascending address order;
    /// results keep that order. Cancellation is observed between hosts and
    /// abandons any probe still in flight.
    #[instrument(skip_all)]
    pub async fn run(&self, events: &EventSender, cancel: &CancellationToken) -> ScanResult {
        let subnets = self.target_subnets();
        info!(subnets = subnets.len(), port = self.options.port, "Printer scan started");

        if subnets.is_empty() {
            emit(events, ScanEvent::Progress("No scannable networks found.".to_string()));
        }

        let mut result = ScanResult::default();

        'subnets: for subnet in subnets {
            if cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }
            emit(events, ScanEvent::Progress(format!("Scanning {}...", subnet)));

            let this = self;
            let probes = futures::stream::iter(subnet.hosts())
                .map(move |ip| {
                    let events = events.clone();
                    async move {
                        emit(
                            &events,
                            ScanEvent::Progress(format!("Scanning {}...\n  Checking {}...", subnet, ip)),
                        );
                        (ip, this.probe_host(ip).await)
                    }
                })
                .buffered(self.options.concurrency.max(1));
            let mut probes = std::pin::pin!(probes);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        result.cancelled = true;
                        break 'subnets;
                    }
                    next = probes.next() => match next {
                        Some((ip, true)) => {
                            let endpoint = PrinterEndpoint::network(ip.to_string(), self.options.port);
                            info!(printer = %endpoint, "Printer found");
                            emit(events, ScanEvent::Found(endpoint.clone()));
                            result.printers.push(endpoint);
                        }
                        Some((_, false)) => {}
                        None => break,
                    }
                }
            }
        }

        info!(
            found = result.printers.len(),
            cancelled = result.cancelled,
            "Printer scan finished"
        );
        emit(events, ScanEvent::Finished(result.clone()));
        result
    }

    /// Run on a background task
    pub fn spawn(self) -> ScanHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move { self.run(&tx, &token).await });

        ScanHandle {
            events: rx,
            cancel,
            task,
        }
    }

    async fn probe_host(&self, ip: Ipv4Addr) -> bool {
        let addr = SocketAddr::from((ip, self.options.port));
        if !port_open(addr, self.options.timeout).await {
            return false;
        }
        classify(addr, self.options.timeout, self.options.policy).await
    }
}

fn emit(events: &EventSender, event: ScanEvent) {
    // Receiver may be gone; the scan still returns its result
    let _ = events.send(event);
}

/// Running background scan
pub struct ScanHandle {
    events: mpsc::UnboundedReceiver<ScanEvent>,
    cancel: CancellationToken,
    task: JoinHandle<ScanResult>,
}

impl ScanHandle {
    /// Next event; `None` once the scan task is gone
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        self.events.recv().await
    }

    /// Request cooperative cancellation
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the scan to end and return its result
    pub async fn join(self) -> ScanResult {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Scan task failed");
                ScanResult {
                    printers: Vec::new(),
                    cancelled: true,
                }
            }
        }
    }
}
