use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zlp_panel::commands::Command;
use zlp_panel::panel::{Panel, PanelOptions};
use zlp_panel::update::DEFAULT_UPDATE_URL;
use zlp_panel::SingleInstance;
use zlp_printer::ClassificationPolicy;
use zlp_server::app_folder;

/// Control panel for the Zebra label server
///
/// Without a subcommand an interactive prompt is started.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,

    /// Application folder holding gui_config.json and log.txt
    #[arg(long, env = "ZLP_HOME", global = true)]
    home: Option<PathBuf>,

    /// Release feed used by `update`
    #[arg(long, env = "ZLP_UPDATE_URL", default_value = DEFAULT_UPDATE_URL, global = true)]
    update_url: String,

    /// Count any host with an open printer port as a printer when scanning
    #[arg(long, global = true)]
    permissive: bool,

    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Show whether the server is running
    Status,
    /// Start the server
    Start,
    /// Stop the server
    Stop,
    /// Open the entry form in a browser
    Open,
    /// Show the entry form address as a QR code
    Qr,
    /// Search the network for Zebra printers
    Scan {
        /// Only scan this network, e.g. 192.168.1.0/24
        subnet: Option<String>,
    },
    /// Send a test label to a printer
    Test { target: String },
    /// Use a printer address and save it
    Select { target: String },
    /// Show the current settings
    Show,
    /// Change and save one setting
    Set { key: String, value: String },
    /// Check for a newer release
    Update,
}

impl From<Cmd> for Command {
    fn from(cmd: Cmd) -> Self {
        match cmd {
            Cmd::Status => Command::Status,
            Cmd::Start => Command::Start,
            Cmd::Stop => Command::Stop,
            Cmd::Open => Command::Open,
            Cmd::Qr => Command::Qr,
            Cmd::Scan { subnet } => Command::Scan(subnet),
            Cmd::Test { target } => Command::Test(target),
            Cmd::Select { target } => Command::Select(target),
            Cmd::Show => Command::Show,
            Cmd::Set { key, value } => Command::Set { key, value },
            Cmd::Update => Command::Update,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let folder = app_folder(cli.home.as_deref());

    zlp_server::init_logger_with_file(
        &cli.log_level,
        false,
        Some(&folder.join("logs").join("panel")),
    )?;

    let mut options = PanelOptions::new(folder);
    options.update_url = cli.update_url;
    if cli.permissive {
        options.scan_policy = ClassificationPolicy::Permissive;
    }

    match cli.cmd {
        Some(cmd) => {
            let mut panel = Panel::new(options);
            panel.run_once(cmd.into()).await;
        }
        None => {
            let _instance = SingleInstance::acquire()?;
            Panel::new(options).run().await?;
        }
    }

    Ok(())
}
