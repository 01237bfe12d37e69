//! Printer discovery handler

use std::time::Duration;

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::ApiResponse;
use tokio::sync::mpsc;
use zlp_printer::discovery::ScanEvent;
use zlp_printer::{ClassificationPolicy, ScanOptions, ScanResult, Scanner, Subnet};

use crate::core::{Result, ServerError, ServerState};

/// Longest per-host timeout a client may ask for
const MAX_TIMEOUT_MS: u64 = 5_000;

/// Body of `POST /api/scan`; every field is optional (`{}` scans the local
/// networks with defaults)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScanRequest {
    /// Scan this CIDR instead of the local interfaces
    pub subnet: Option<String>,
    /// Treat hosts whose identification probe fails as printers
    pub permissive: bool,
    pub timeout_ms: Option<u64>,
    /// Raw printing port to probe (default 9100)
    pub port: Option<u16>,
}

impl ScanRequest {
    fn to_options(&self) -> Result<ScanOptions> {
        let mut options = ScanOptions::default();

        if let Some(raw) = &self.subnet {
            let subnet: Subnet = raw
                .parse()
                .map_err(|e: zlp_printer::PrintError| ServerError::Validation(e.to_string()))?;
            if subnet.prefix() < options.min_prefix_len {
                return Err(ServerError::Validation(format!(
                    "Subnet {} is larger than /{}",
                    subnet, options.min_prefix_len
                )));
            }
            options.subnets = Some(vec![subnet]);
        }
        if self.permissive {
            options.policy = ClassificationPolicy::Permissive;
        }
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(ms) = self.timeout_ms {
            options.timeout = Duration::from_millis(ms.clamp(1, MAX_TIMEOUT_MS));
        }
        Ok(options)
    }
}

/// POST /api/scan - run a discovery scan and return the printers found
///
/// The scan stops early (with partial results) when the server shuts down.
pub async fn scan<T: zlp_printer::Transport + 'static>(
    State(state): State<ServerState<T>>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ApiResponse<ScanResult>>> {
    let scanner = Scanner::new(request.to_options()?);
    let cancel = state.shutdown.child_token();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let result = scanner.run(&tx, &cancel).await;
    drop(tx);

    while let Some(event) = rx.recv().await {
        if let ScanEvent::Progress(text) = event {
            tracing::trace!(progress = %text, "Scan progress");
        }
    }

    let message = match result.printers.len() {
        0 => "No Zebra printers found.".to_string(),
        n => format!("Found {} printer(s)", n),
    };
    Ok(Json(ApiResponse::ok_with_message(result, message)))
}
