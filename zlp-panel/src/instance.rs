//! Single-instance guard
//!
//! The first panel binds a fixed loopback port and holds it for its
//! lifetime; a second panel fails to bind and exits.

use std::net::{Ipv4Addr, TcpListener};

use crate::error::{PanelError, PanelResult};

/// Port held by the running panel
pub const INSTANCE_PORT: u16 = 47913;

#[derive(Debug)]
pub struct SingleInstance {
    _listener: TcpListener,
}

impl SingleInstance {
    pub fn acquire() -> PanelResult<Self> {
        Self::acquire_on(INSTANCE_PORT)
    }

    pub fn acquire_on(port: u16) -> PanelResult<Self> {
        TcpListener::bind((Ipv4Addr::LOCALHOST, port))
            .map(|listener| Self { _listener: listener })
            .map_err(|_| PanelError::AnotherInstance)
    }
}
