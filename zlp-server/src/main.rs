use std::path::PathBuf;

use clap::Parser;
use zlp_server::{Config, ConfigStore, Server, ServerState, app_folder, print_banner};

/// Zebra label printing web server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// HTTP port (defaults to `server_port` from the settings file)
    #[arg(env = "ZLP_PORT")]
    port: Option<u16>,

    /// Application folder holding gui_config.json and log.txt
    #[arg(long, env = "ZLP_HOME")]
    home: Option<PathBuf>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let folder = app_folder(cli.home.as_deref());

    zlp_server::init_logger_with_file(&cli.log_level, cli.log_json, Some(&folder.join("logs")))?;
    print_banner();

    // Settings problems are never fatal
    let settings = ConfigStore::in_folder(&folder).load_or_default();

    let port = cli.port.unwrap_or_else(|| settings.server_port_number());
    let config = Config::new(folder, port);
    let state = ServerState::initialize(config, settings);

    if let Err(e) = Server::with_state(state).run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
