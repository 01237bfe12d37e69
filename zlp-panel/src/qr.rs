//! Terminal QR code for the entry form address
//!
//! Lets a phone on the same network open the form by pointing its camera at
//! the console.

use std::net::Ipv4Addr;

use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;

use crate::error::PanelResult;

/// Form address as seen from the LAN
///
/// Falls back to the loopback address when no interface has one.
pub fn lan_url(port: u16) -> String {
    let host = zlp_printer::discovery::lan_address().unwrap_or(Ipv4Addr::LOCALHOST);
    format!("http://{}:{}", host, port)
}

/// Render `text` as a QR code of half-height block characters
///
/// Colors are inverted so the code scans on dark terminal backgrounds.
pub fn render(text: &str) -> PanelResult<String> {
    let code = QrCode::new(text.as_bytes())?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
