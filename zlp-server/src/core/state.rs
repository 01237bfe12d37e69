use std::sync::Arc;
use std::time::Instant;

use shared::models::AppConfig;
use tokio_util::sync::CancellationToken;
use zlp_printer::{RawTransport, Transport};

use crate::core::Config;
use crate::printing::{PrintHandler, PrintLog};

/// Shared handler state
///
/// Cheap to clone: everything sits behind `Arc`s. Settings are read once at
/// startup and never change while the server runs; the panel restarts the
/// server after saving new settings.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | process options |
/// | settings | user settings from `gui_config.json` |
/// | printer | print pipeline (transport, endpoint, display settings, log) |
/// | shutdown | cancelled by `/stop` or Ctrl-C |
pub struct ServerState<T = RawTransport> {
    pub config: Arc<Config>,
    pub settings: Arc<AppConfig>,
    pub printer: Arc<PrintHandler<T>>,
    pub shutdown: CancellationToken,
    started_at: Instant,
}

impl<T> Clone for ServerState<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            settings: self.settings.clone(),
            printer: self.printer.clone(),
            shutdown: self.shutdown.clone(),
            started_at: self.started_at,
        }
    }
}

impl ServerState<RawTransport> {
    /// State wired to the real printer transport
    pub fn initialize(config: Config, settings: AppConfig) -> Self {
        Self::with_transport(config, settings, RawTransport::new())
    }
}

impl<T: Transport> ServerState<T> {
    pub fn with_transport(config: Config, settings: AppConfig, transport: T) -> Self {
        let printer = PrintHandler::new(
            transport,
            settings.printer_endpoint(),
            settings.display_settings(),
            PrintLog::new(config.print_log_file()),
        );

        tracing::info!(
            printer = %printer.endpoint(),
            currency = %settings.currency,
            "Print handler ready"
        );

        Self {
            config: Arc::new(config),
            settings: Arc::new(settings),
            printer: Arc::new(printer),
            shutdown: CancellationToken::new(),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Ask the server to stop gracefully
    pub fn request_shutdown(&self) {
        self.shutdown.cancel();
    }
}
