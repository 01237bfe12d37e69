//! User-facing print event log (`log.txt`)
//!
//! One line per event: `YYYY-MM-DD HH:MM:SS - [Error: ]<message>`.
//! Every entry is also mirrored to `tracing`. Failing to write the file is
//! logged and otherwise ignored.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only print event log
#[derive(Debug)]
pub struct PrintLog {
    path: PathBuf,
    // Keeps lines from concurrent requests whole
    write_lock: Mutex<()>,
}

impl PrintLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a successful event
    pub async fn info(&self, message: &str) {
        self.append(message, true).await;
    }

    /// Record a failure (prefixed with `Error: `)
    pub async fn error(&self, message: &str) {
        self.append(message, false).await;
    }

    pub async fn append(&self, message: &str, success: bool) {
        let line = format_entry(Local::now(), message, success);
        if success {
            tracing::info!(target: "print_log", "{}", message);
        } else {
            tracing::warn!(target: "print_log", "{}", message);
        }

        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.write_line(&line).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write print log");
        }
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", line).as_bytes()).await?;
        file.flush().await
    }
}

/// Format one log line (without the trailing newline)
pub fn format_entry(at: DateTime<Local>, message: &str, success: bool) -> String {
    format!(
        "{} - {}{}",
        at.format(TIMESTAMP_FORMAT),
        if success { "" } else { "Error: " },
        message
    )
}
