//! HTTP server startup and shutdown

use std::net::SocketAddr;

use tokio::net::TcpListener;
use zlp_printer::Transport;

use crate::core::ServerState;

/// HTTP server
pub struct Server<T = zlp_printer::RawTransport> {
    state: ServerState<T>,
}

impl<T: Transport + 'static> Server<T> {
    pub fn with_state(state: ServerState<T>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ServerState<T> {
        &self.state
    }

    /// Bind the configured address and serve until shutdown
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.state.config.bind_addr, self.state.config.http_port);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    ///
    /// Returns once `/stop` was called or Ctrl-C was pressed and in-flight
    /// requests have completed.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let local = listener.local_addr()?;
        tracing::info!("Label server listening on http://{}", local);

        let shutdown = self.state.shutdown.clone();
        let app = crate::api::build_app(self.state);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("Label server stopped");
        Ok(())
    }
}

async fn shutdown_signal(token: tokio_util::sync::CancellationToken) {
    tokio::select! {
        _ = token.cancelled() => {
            tracing::info!("Shutdown requested");
        }
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                // Fall back to the token only
                token.cancelled().await;
            }
            tracing::info!("Shutting down...");
            token.cancel();
        }
    }
}
