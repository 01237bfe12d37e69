use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Server already running on port {0}")]
    AlreadyRunning(u16),

    #[error("Failed to start {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Server did not answer within {0} seconds")]
    StartTimeout(u64),

    #[error("Another panel is already running")]
    AnotherInstance,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Update server returned HTTP {0}")]
    UpdateStatus(u16),

    #[error(transparent)]
    Print(#[from] zlp_printer::PrintError),

    #[error("Failed to build QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

pub type PanelResult<T> = Result<T, PanelError>;
