//! Persisted settings document
//!
//! Mirrors the flat JSON object stored in `gui_config.json`. Keys this
//! version does not know about are kept in [`AppConfig::extra`] so they
//! survive a load/save cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::endpoint::{DEFAULT_PRINTER_PORT, PrinterEndpoint, TransportKind};
use super::price::DisplaySettings;

/// Default port of the local web server
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Which preset price buttons the entry form offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceSuggestionType {
    #[default]
    Hungary,
    Poland,
    Czech,
}

impl PriceSuggestionType {
    pub const ALL: [PriceSuggestionType; 3] = [Self::Hungary, Self::Poland, Self::Czech];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hungary => "Hungary",
            Self::Poland => "Poland",
            Self::Czech => "Czech",
        }
    }

    /// Common shelf price points for the market
    pub fn suggestions(&self) -> Vec<Decimal> {
        let raw: &[&str] = match self {
            Self::Hungary => &[
                "99", "199", "299", "399", "499", "699", "999", "1499", "1999", "2999", "4999",
            ],
            Self::Poland => &[
                "1.99", "2.99", "4.99", "9.99", "14.99", "19.99", "29.99", "49.99", "99.99",
            ],
            Self::Czech => &[
                "9.90", "19.90", "29.90", "49.90", "99.90", "149.90", "199.90", "299.90",
            ],
        };
        raw.iter().filter_map(|p| Decimal::from_str(p).ok()).collect()
    }
}

impl fmt::Display for PriceSuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceSuggestionType {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingError::InvalidValue {
                key: "price_suggestion_type".into(),
                value: s.into(),
            })
    }
}

/// Error raised when a single setting is edited with an invalid value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Settings file contents
///
/// Ports are kept as strings because that is how the settings file stores
/// them; use [`AppConfig::server_port_number`] and
/// [`AppConfig::printer_endpoint`] to get typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_port: String,
    pub printer_ip: String,
    pub printer_port: String,
    pub print_mode: TransportKind,
    pub usb_printer: String,
    pub currency: String,
    pub show_decimals: bool,
    pub decimal_places: i64,
    pub price_suggestion_type: PriceSuggestionType,
    pub start_server_on_launch: bool,
    /// Keys not known to this version
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT.to_string(),
            printer_ip: "127.0.0.1".into(),
            printer_port: DEFAULT_PRINTER_PORT.to_string(),
            print_mode: TransportKind::NetTcp,
            usb_printer: String::new(),
            currency: "HUF".into(),
            show_decimals: false,
            decimal_places: 2,
            price_suggestion_type: PriceSuggestionType::Hungary,
            start_server_on_launch: true,
            extra: Map::new(),
        }
    }
}

impl AppConfig {
    /// Names of the keys this version writes
    pub const KNOWN_KEYS: [&'static str; 10] = [
        "server_port",
        "printer_ip",
        "printer_port",
        "print_mode",
        "usb_printer",
        "currency",
        "show_decimals",
        "decimal_places",
        "price_suggestion_type",
        "start_server_on_launch",
    ];

    /// Label formatting settings, with `decimal_places` clamped to `0..=4`
    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings::new(self.currency.clone(), self.show_decimals, self.decimal_places)
    }

    /// Web server port, falling back to 5000 when the stored value is not a port
    pub fn server_port_number(&self) -> u16 {
        parse_port(&self.server_port).unwrap_or_else(|| {
            tracing::warn!(value = %self.server_port, "Invalid server_port, using default");
            DEFAULT_SERVER_PORT
        })
    }

    /// Configured printer, according to `print_mode`
    pub fn printer_endpoint(&self) -> PrinterEndpoint {
        match self.print_mode {
            TransportKind::NetTcp => {
                let port = parse_port(&self.printer_port).unwrap_or_else(|| {
                    tracing::warn!(value = %self.printer_port, "Invalid printer_port, using default");
                    DEFAULT_PRINTER_PORT
                });
                PrinterEndpoint::network(self.printer_ip.trim(), port)
            }
            TransportKind::Usb => PrinterEndpoint::usb(self.usb_printer.trim()),
        }
    }

    /// Set one key from user-typed text
    ///
    /// Unknown keys are stored verbatim in `extra`.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), SettingError> {
        let invalid = || SettingError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        };
        let value = raw.trim();

        match key {
            "server_port" => {
                parse_port(value).ok_or_else(invalid)?;
                self.server_port = value.to_string();
            }
            "printer_port" => {
                parse_port(value).ok_or_else(invalid)?;
                self.printer_port = value.to_string();
            }
            "printer_ip" => self.printer_ip = value.to_string(),
            "print_mode" => {
                self.print_mode = match value.to_ascii_uppercase().as_str() {
                    "NET/TCP" | "NET" | "TCP" => TransportKind::NetTcp,
                    "USB" => TransportKind::Usb,
                    _ => return Err(invalid()),
                }
            }
            "usb_printer" => self.usb_printer = value.to_string(),
            "currency" => self.currency = value.to_string(),
            "show_decimals" => self.show_decimals = parse_bool(value).ok_or_else(invalid)?,
            "decimal_places" => {
                let places: i64 = value.parse().map_err(|_| invalid())?;
                if !(0..=4).contains(&places) {
                    return Err(invalid());
                }
                self.decimal_places = places;
            }
            "price_suggestion_type" => self.price_suggestion_type = value.parse()?,
            "start_server_on_launch" => {
                self.start_server_on_launch = parse_bool(value).ok_or_else(invalid)?
            }
            other => {
                self.extra
                    .insert(other.to_string(), Value::String(value.to_string()));
            }
        }
        Ok(())
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|p| *p != 0)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_serializes_all_known_keys() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        let obj = value.as_object().unwrap();
        for key in AppConfig::KNOWN_KEYS {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(obj["print_mode"], "NET/TCP");
        assert_eq!(obj["server_port"], "5000");
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let json = r#"{"currency":"PLN","foo":"bar","nested":{"a":1}}"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.currency, "PLN");
        assert_eq!(cfg.extra.get("foo"), Some(&Value::String("bar".into())));

        let back = serde_json::to_value(&cfg).unwrap();
        assert_eq!(back["foo"], "bar");
        assert_eq!(back["nested"]["a"], 1);
    }

    #[test]
    fn test_printer_endpoint_by_mode() {
        let mut cfg = AppConfig {
            printer_ip: "192.168.1.50".into(),
            printer_port: "6101".into(),
            ..Default::default()
        };
        assert_eq!(cfg.printer_endpoint(), PrinterEndpoint::network("192.168.1.50", 6101));

        cfg.print_mode = TransportKind::Usb;
        cfg.usb_printer = "ZDesigner".into();
        assert_eq!(cfg.printer_endpoint(), PrinterEndpoint::usb("ZDesigner"));
    }

    #[test]
    fn test_invalid_ports_fall_back() {
        let cfg = AppConfig {
            server_port: "abc".into(),
            printer_port: "".into(),
            ..Default::default()
        };
        assert_eq!(cfg.server_port_number(), DEFAULT_SERVER_PORT);
        assert_eq!(cfg.printer_endpoint().port, DEFAULT_PRINTER_PORT);
    }

    #[test]
    fn test_set_field() {
        let mut cfg = AppConfig::default();
        cfg.set_field("show_decimals", "yes").unwrap();
        cfg.set_field("decimal_places", "3").unwrap();
        cfg.set_field("price_suggestion_type", "poland").unwrap();
        cfg.set_field("print_mode", "usb").unwrap();
        cfg.set_field("custom", "value").unwrap();

        assert!(cfg.show_decimals);
        assert_eq!(cfg.decimal_places, 3);
        assert_eq!(cfg.price_suggestion_type, PriceSuggestionType::Poland);
        assert_eq!(cfg.print_mode, TransportKind::Usb);
        assert_eq!(cfg.extra["custom"], "value");

        assert!(cfg.set_field("decimal_places", "5").is_err());
        assert!(cfg.set_field("server_port", "70000").is_err());
        assert!(cfg.set_field("show_decimals", "maybe").is_err());
    }

    #[test]
    fn test_suggestions_parse() {
        for kind in PriceSuggestionType::ALL {
            assert!(!kind.suggestions().is_empty());
        }
    }
}
