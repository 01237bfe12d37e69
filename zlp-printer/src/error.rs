//! Printer error types

use thiserror::Error;

/// Why a label could not be handed to a printer
#[derive(Debug, Error)]
pub enum PrintError {
    /// TCP connect refused or reset
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Print queue could not be opened
    #[error("Printer offline: {0}")]
    Offline(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Bad address, port or queue name
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Transport not available on this platform
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Spooler call failed
    #[cfg(windows)]
    #[error("Windows printer error: {0}")]
    WindowsPrinter(String),
}

impl PrintError {
    /// Whether the printer could not be reached at all, as opposed to a
    /// configuration problem on this side
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            PrintError::Connection(_) | PrintError::Offline(_) | PrintError::Timeout(_)
        )
    }
}

pub type PrintResult<T> = Result<T, PrintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_classification() {
        assert!(PrintError::Timeout("10.0.0.5:9100".into()).is_unreachable());
        assert!(PrintError::Connection("refused".into()).is_unreachable());
        assert!(!PrintError::InvalidConfig("port".into()).is_unreachable());
        assert!(!PrintError::Unsupported("usb".into()).is_unreachable());
    }
}
