//! Logging setup
//!
//! Console output plus, when a log directory is given, daily rotating
//! files under `<log_dir>/app/` that are deleted after 14 days.
//! The user-facing `log.txt` is separate, see [`crate::printing::PrintLog`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Days a rotated diagnostic log is kept
pub const LOG_RETENTION_DAYS: i64 = 14;

const APP_LOG_PREFIX: &str = "app";

/// Remove rotated application logs older than the retention period
///
/// Files are named `app.YYYY-MM-DD` by the rolling appender.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = Local::now() - chrono::Duration::days(LOG_RETENTION_DAYS);
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = log_file_date(name) else {
            continue;
        };
        if let Some(day_start) = date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
            && day_start < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }
    Ok(removed)
}

fn log_file_date(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(APP_LOG_PREFIX)?.strip_prefix('.')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - default filter (e.g. "info"); `RUST_LOG` overrides it
/// * `json_format` - JSON lines instead of human-readable output
/// * `log_dir` - also write daily rotating files here
///
/// # Examples
/// ```no_run
/// // Console only
/// zlp_server::init_logger_with_file("debug", false, None)?;
///
/// // Console + files
/// zlp_server::init_logger_with_file("info", true, Some(std::path::Path::new("./logs")))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let Some(log_dir) = log_dir else {
        subscriber.with(console_layer).try_init()?;
        return Ok(());
    };

    let app_log_dir = log_dir.join("app");
    fs::create_dir_all(&app_log_dir)?;
    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, APP_LOG_PREFIX);

    let file_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::sync::Mutex::new(app_log))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(app_log))
            .boxed()
    };

    subscriber.with(console_layer).with(file_layer).try_init()?;

    if let Err(e) = cleanup_old_logs(log_dir) {
        tracing::warn!(error = %e, "Failed to cleanup old logs");
    }
    tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));

    Ok(())
}

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Runs every hour
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}
