//! Launching the server as a child process

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{info, warn};
use zlp_server::core::config::HOME_ENV;

use crate::client::ServerClient;
use crate::error::{PanelError, PanelResult};

const SERVER_BINARY: &str = "zlp-server";
const START_TIMEOUT_SECS: u64 = 10;
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// The server executable installed next to the panel
pub fn server_executable() -> PathBuf {
    let name = format!("{}{}", SERVER_BINARY, std::env::consts::EXE_SUFFIX);
    match std::env::current_exe() {
        Ok(exe) => exe.with_file_name(name),
        Err(_) => PathBuf::from(name),
    }
}

/// Start the server on `port` and wait for its health check
///
/// Refuses when something already answers on that port. The child is
/// killed if it does not come up in time.
pub async fn start_server(
    executable: &Path,
    port: u16,
    app_folder: &Path,
    client: &ServerClient,
) -> PanelResult<Child> {
    if client.health().await.is_some() {
        return Err(PanelError::AlreadyRunning(port));
    }

    info!(exe = %executable.display(), port, "Starting server");
    let mut child = Command::new(executable)
        .arg(port.to_string())
        .env(HOME_ENV, app_folder)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| PanelError::Spawn {
            path: executable.to_path_buf(),
            source,
        })?;

    if client
        .wait_until_up(Duration::from_secs(START_TIMEOUT_SECS))
        .await
    {
        return Ok(child);
    }

    warn!("Server did not come up, killing it");
    let _ = child.kill().await;
    Err(PanelError::StartTimeout(START_TIMEOUT_SECS))
}

/// Stop the server over HTTP and reap the child if this panel owns it
///
/// Returns the message to show the user.
pub async fn stop_server(client: &ServerClient, child: Option<Child>) -> String {
    let message = match client.stop().await {
        Some(message) => message,
        None => "Server was not running.".to_string(),
    };

    if let Some(mut child) = child {
        match tokio::time::timeout(STOP_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => info!(%status, "Server exited"),
            _ => {
                warn!("Server did not exit, killing it");
                let _ = child.kill().await;
            }
        }
    } else {
        client.wait_until_down(STOP_TIMEOUT).await;
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_executable_is_sibling() {
        let exe = server_executable();
        let name = exe.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(SERVER_BINARY));
        if let Ok(current) = std::env::current_exe() {
            assert_eq!(exe.parent(), current.parent());
        }
    }
}
