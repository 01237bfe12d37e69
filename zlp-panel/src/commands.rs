//! Panel commands typed at the prompt

use thiserror::Error;

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Start,
    Stop,
    Open,
    /// Show the LAN address of the entry form as a QR code
    Qr,
    /// Scan the local networks, or only the given CIDR
    Scan(Option<String>),
    Cancel,
    /// Send the test label to an address
    Test(String),
    /// Use an address, or a number from the last scan, as the printer
    Select(String),
    Show,
    Set { key: String, value: String },
    Save,
    Update,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(pub String);

pub const HELP: &str = "\
Commands:
  status              show whether the server is running
  start               start the server
  stop                stop the server
  open                open the entry form in a browser
  qr                  show the entry form address as a QR code for phones
  scan [CIDR]         search the network for Zebra printers
  cancel              stop a running scan
  test <ip>           send a test label to a printer
  select <ip|n>       use a printer (address or number from the last scan)
  show                show the current settings
  set <key> <value>   change a setting
  save                write settings to disk
  update              check for a newer release
  help                show this list
  quit                stop the server and exit";

impl Command {
    /// Parse one prompt line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let arg = words.next().map(str::to_string);
        let missing = |what: &str| ParseError(format!("Usage: {} {}", name, what));

        let command = match name.to_ascii_lowercase().as_str() {
            "status" => Self::Status,
            "start" => Self::Start,
            "stop" => Self::Stop,
            "open" => Self::Open,
            "qr" => Self::Qr,
            "scan" => Self::Scan(arg),
            "cancel" => Self::Cancel,
            "test" => Self::Test(arg.ok_or_else(|| missing("<ip>"))?),
            "select" => Self::Select(arg.ok_or_else(|| missing("<ip|n>"))?),
            "show" => Self::Show,
            "set" => {
                let key = arg.ok_or_else(|| missing("<key> <value>"))?;
                // Values may contain spaces (USB queue names)
                let value = line
                    .trim()
                    .splitn(3, char::is_whitespace)
                    .nth(2)
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string();
                Self::Set { key, value }
            }
            "save" => Self::Save,
            "update" => Self::Update,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError(format!("Unknown command: {} (try `help`)", other))),
        };
        Ok(Some(command))
    }
}
