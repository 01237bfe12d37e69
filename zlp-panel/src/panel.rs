//! Interactive panel loop
//!
//! Prompt lines and background-task reports arrive on two sources and are
//! handled one at a time by [`Panel::run`]. Anything that touches the
//! network (health checks, starting and stopping the server, scans, test
//! prints, the update check) runs on a spawned task and reports back as a
//! [`PanelEvent`].

use std::io::{BufRead, Write};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use shared::models::{AppConfig, DEFAULT_PRINTER_PORT, PrinterEndpoint, TransportKind};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use zlp_printer::{
    ClassificationPolicy, RawTransport, ScanEvent, ScanOptions, Scanner, Subnet, Transport,
    test_label,
};
use zlp_server::ConfigStore;
use zlp_server::api::health::HealthResponse;

use crate::client::ServerClient;
use crate::commands::{Command, HELP};
use crate::error::PanelResult;
use crate::process;
use crate::qr;
use crate::update::{self, UpdateStatus};

/// Timeout for the test label connection
const TEST_PRINT_TIMEOUT: Duration = Duration::from_secs(1);

/// Reports from background tasks
#[derive(Debug)]
pub enum PanelEvent {
    Status(Option<HealthResponse>),
    Started(PanelResult<Child>),
    Stopped(String),
    Scan(ScanEvent),
    TestPrinted {
        target: String,
        result: PanelResult<()>,
    },
    UpdateChecked(PanelResult<UpdateStatus>),
}

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Panel startup options
#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub app_folder: PathBuf,
    pub server_executable: PathBuf,
    pub update_url: String,
    pub scan_policy: ClassificationPolicy,
}

impl PanelOptions {
    pub fn new(app_folder: PathBuf) -> Self {
        Self {
            app_folder,
            server_executable: process::server_executable(),
            update_url: update::DEFAULT_UPDATE_URL.to_string(),
            scan_policy: ClassificationPolicy::Strict,
        }
    }
}

pub struct Panel {
    options: PanelOptions,
    store: ConfigStore,
    settings: AppConfig,
    client: ServerClient,
    /// Port `client` talks to
    server_port: u16,
    /// Server process started by this panel
    child: Option<Child>,
    starting: bool,
    scan: Option<CancellationToken>,
    last_scan: Vec<PrinterEndpoint>,
    /// Background jobs that have not reported their result yet
    in_flight: usize,
    events: mpsc::UnboundedSender<PanelEvent>,
    inbox: mpsc::UnboundedReceiver<PanelEvent>,
}

impl Panel {
    /// Load settings from the app folder, creating the file if missing
    ///
    /// An unreadable settings file is reported and replaced by defaults.
    pub fn new(options: PanelOptions) -> Self {
        let store = ConfigStore::in_folder(&options.app_folder);
        let settings = store.load_or_default();
        let server_port = settings.server_port_number();
        let client = ServerClient::new(server_port);
        let (events, inbox) = mpsc::unbounded_channel();

        Self {
            options,
            store,
            settings,
            client,
            server_port,
            child: None,
            starting: false,
            scan: None,
            last_scan: Vec::new(),
            in_flight: 0,
            events,
            inbox,
        }
    }

    pub fn settings(&self) -> &AppConfig {
        &self.settings
    }

    pub fn client(&self) -> &ServerClient {
        &self.client
    }

    pub fn last_scan(&self) -> &[PrinterEndpoint] {
        &self.last_scan
    }

    pub fn is_scanning(&self) -> bool {
        self.scan.is_some()
    }

    /// Wait for the next background report
    pub async fn next_event(&mut self) -> Option<PanelEvent> {
        self.inbox.recv().await
    }

    /// Run the prompt until `quit` or end of input
    pub async fn run(mut self) -> PanelResult<()> {
        println!("Zebra Label Printer panel {}", env!("CARGO_PKG_VERSION"));
        println!("Type `help` for commands.");

        if self.settings.start_server_on_launch {
            self.execute(Command::Start);
        }
        prompt();

        let mut lines = stdin_lines();
        loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else {
                        break;
                    };
                    match Command::parse(&line) {
                        Ok(Some(command)) => {
                            if self.execute(command) == Flow::Quit {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => println!("{}", e),
                    }
                    prompt();
                }
                Some(event) = self.inbox.recv() => {
                    self.handle_event(event);
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Run one command to completion, for use outside the prompt
    ///
    /// Setting changes are saved right away.
    pub async fn run_once(&mut self, command: Command) {
        let persist = matches!(command, Command::Set { .. } | Command::Select(_));

        self.execute(command);
        if persist {
            self.save();
        }

        while self.in_flight > 0 {
            let Some(event) = self.inbox.recv().await else {
                break;
            };
            self.handle_event(event);
        }
    }

    /// Stop the scan and the server before exiting
    pub async fn shutdown(&mut self) {
        if let Some(token) = self.scan.take() {
            token.cancel();
        }
        let child = self.child.take();
        if child.is_some() || self.client.health().await.is_some() {
            println!("{}", process::stop_server(&self.client, child).await);
        }
    }

    /// Carry out one command
    ///
    /// Network work is spawned; its result arrives later as a
    /// [`PanelEvent`].
    pub fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Status => {
                let client = self.client.clone();
                self.spawn(async move { PanelEvent::Status(client.health().await) });
            }
            Command::Start => self.start(),
            Command::Stop => {
                let client = self.client.clone();
                let child = self.child.take();
                self.spawn(async move {
                    PanelEvent::Stopped(process::stop_server(&client, child).await)
                });
            }
            Command::Open => self.open(),
            Command::Qr => self.show_qr(),
            Command::Scan(subnet) => self.scan(subnet.as_deref()),
            Command::Cancel => match &self.scan {
                Some(token) => {
                    token.cancel();
                    println!("Cancelling scan...");
                }
                None => println!("No scan is running."),
            },
            Command::Test(target) => self.test_print(&target),
            Command::Select(target) => self.select(&target),
            Command::Show => match serde_json::to_string_pretty(&self.settings) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("Error: {}", e),
            },
            Command::Set { key, value } => match self.settings.set_field(&key, &value) {
                Ok(()) => println!("{} = {}. Use `save` to keep it.", key, value.trim()),
                Err(e) => println!("Error: {}", e),
            },
            Command::Save => self.save(),
            Command::Update => {
                let url = self.options.update_url.clone();
                self.spawn(async move {
                    PanelEvent::UpdateChecked(
                        update::check_for_update(&url, env!("CARGO_PKG_VERSION")).await,
                    )
                });
                println!("Checking for updates...");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Apply a background report
    pub fn handle_event(&mut self, event: PanelEvent) {
        if !matches!(
            event,
            PanelEvent::Scan(ScanEvent::Progress(_) | ScanEvent::Found(_))
        ) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        match event {
            PanelEvent::Status(Some(health)) => println!(
                "Server running at {} (version {}, up {}s)",
                self.client.base_url(),
                health.version,
                health.uptime_seconds
            ),
            PanelEvent::Status(None) => println!("Server is not running."),
            PanelEvent::Started(Ok(child)) => {
                self.starting = false;
                self.child = Some(child);
                println!("Server started at {}", self.client.base_url());
            }
            PanelEvent::Started(Err(e)) => {
                self.starting = false;
                println!("Error: {}", e);
            }
            PanelEvent::Stopped(message) => println!("{}", message),
            PanelEvent::Scan(event) => self.scan_event(event),
            PanelEvent::TestPrinted { target, result } => match result {
                Ok(()) => println!("Test label sent to {}", target),
                Err(e) => println!("Test print to {} failed: {}", target, e),
            },
            PanelEvent::UpdateChecked(Ok(status)) => {
                println!("{}", status.message(env!("CARGO_PKG_VERSION")))
            }
            PanelEvent::UpdateChecked(Err(e)) => println!("Update check failed: {}", e),
        }
    }

    fn start(&mut self) {
        if self.starting {
            println!("Server is already starting.");
            return;
        }
        if self.child.is_none() {
            self.server_port = self.settings.server_port_number();
            self.client = ServerClient::new(self.server_port);
        }
        self.starting = true;
        println!("Starting server...");

        let client = self.client.clone();
        let exe = self.options.server_executable.clone();
        let folder = self.options.app_folder.clone();
        let port = self.server_port;
        self.spawn(async move {
            PanelEvent::Started(process::start_server(&exe, port, &folder, &client).await)
        });
    }

    fn open(&self) {
        let url = self.client.base_url();
        println!("Entry form: {}", url);
        if let Err(e) = open::that_detached(url) {
            warn!(error = %e, "Failed to open browser");
        }
    }

    /// Address phones on the LAN use for the entry form
    pub fn lan_url(&self) -> String {
        qr::lan_url(self.server_port)
    }

    fn show_qr(&self) {
        let url = self.lan_url();
        match qr::render(&url) {
            Ok(art) => println!("{}\nScan to open {}", art, url),
            Err(e) => println!("Error: {}", e),
        }
    }

    fn scan(&mut self, subnet: Option<&str>) {
        if self.scan.is_some() {
            println!("A scan is already running. Use `cancel` to stop it.");
            return;
        }

        let mut options = ScanOptions {
            policy: self.options.scan_policy,
            ..ScanOptions::default()
        };
        if let Some(raw) = subnet {
            match raw.parse::<Subnet>() {
                Ok(subnet) if subnet.prefix() < options.min_prefix_len => {
                    println!(
                        "Error: Subnet {} is larger than /{}",
                        subnet, options.min_prefix_len
                    );
                    return;
                }
                Ok(subnet) => options.subnets = Some(vec![subnet]),
                Err(e) => {
                    println!("Error: {}", e);
                    return;
                }
            }
        }

        let mut handle = Scanner::new(options).spawn();
        self.scan = Some(handle.cancel_token());
        self.in_flight += 1;
        self.last_scan.clear();

        let events = self.events.clone();
        tokio::spawn(async move {
            while let Some(event) = handle.next_event().await {
                if events.send(PanelEvent::Scan(event)).is_err() {
                    handle.cancel();
                    break;
                }
            }
        });
    }

    fn scan_event(&mut self, event: ScanEvent) {
        match event {
            // Per-host lines are too chatty for the console
            ScanEvent::Progress(text) if text.contains('\n') => {
                tracing::debug!(progress = %text, "Scan progress");
            }
            ScanEvent::Progress(text) => println!("{}", text),
            ScanEvent::Found(endpoint) => {
                self.last_scan.push(endpoint.clone());
                println!("  [{}] {}", self.last_scan.len(), endpoint.address);
            }
            ScanEvent::Finished(result) => {
                self.scan = None;
                self.last_scan = result.printers;
                if result.cancelled {
                    println!("Scan cancelled.");
                }
                if self.last_scan.is_empty() {
                    println!("No Zebra printers found.");
                } else {
                    println!(
                        "Found {} printer(s). Use `select <n>` to pick one.",
                        self.last_scan.len()
                    );
                }
            }
        }
    }

    /// Resolve `n` from the last scan or a literal address
    fn resolve_target(&self, target: &str) -> Option<PrinterEndpoint> {
        if let Ok(n) = target.parse::<usize>()
            && let Some(endpoint) = n.checked_sub(1).and_then(|i| self.last_scan.get(i))
        {
            return Some(endpoint.clone());
        }
        target
            .parse::<IpAddr>()
            .ok()
            .map(|ip| PrinterEndpoint::network(ip.to_string(), DEFAULT_PRINTER_PORT))
    }

    fn test_print(&mut self, target: &str) {
        let Some(endpoint) = self.resolve_target(target) else {
            println!("Invalid printer address: {}", target);
            return;
        };
        println!("Sending test label to {}...", endpoint);

        self.spawn(async move {
            let transport = RawTransport::new().with_timeout(TEST_PRINT_TIMEOUT);
            let result = transport
                .send(&endpoint, &test_label())
                .await
                .map_err(Into::into);
            PanelEvent::TestPrinted {
                target: endpoint.address,
                result,
            }
        });
    }

    fn select(&mut self, target: &str) {
        let Some(endpoint) = self.resolve_target(target) else {
            println!("Invalid printer address: {}", target);
            return;
        };
        self.settings.printer_ip = endpoint.address.clone();
        self.settings.printer_port = endpoint.port.to_string();
        self.settings.print_mode = TransportKind::NetTcp;
        info!(printer = %endpoint, "Printer selected");
        println!("Printer set to {}. Use `save` to keep it.", endpoint);
    }

    fn save(&mut self) {
        match self.store.save(&self.settings) {
            Ok(()) => {
                println!("Settings saved to {}", self.store.path().display());
                if self.child.is_some() {
                    println!("Restart the server (`stop`, then `start`) to apply them.");
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = PanelEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let events = self.events.clone();
        tokio::spawn(async move {
            let _ = events.send(task.await);
        });
    }
}

/// Read stdin on a plain thread so a pending read never holds up exit
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break;
                }
            }
        }
    });
    rx
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
