//! IPv4 subnets and local interface enumeration

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use sysinfo::Networks;
use tracing::debug;

use crate::error::PrintError;

/// IPv4 network in CIDR form, stored with host bits cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    /// Network containing `addr`; `None` when `prefix` is over 32
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Option<Self> {
        if prefix > 32 {
            return None;
        }
        let network = Ipv4Addr::from(u32::from(addr) & mask(prefix));
        Some(Self { network, prefix })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the block, including network and broadcast
    pub fn size(&self) -> u64 {
        1u64 << (32 - self.prefix as u32)
    }

    /// Usable host addresses in ascending order
    ///
    /// The network and broadcast addresses are skipped, except for /31 and
    /// /32 where every address is a host.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let base = u32::from(self.network);
        let last = base + (self.size() - 1) as u32;
        let (start, end) = if self.prefix >= 31 {
            (base, last)
        } else {
            (base + 1, last - 1)
        };
        (start..=end).map(Ipv4Addr::from)
    }
}

fn mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix as u32)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl FromStr for Subnet {
    type Err = PrintError;

    /// Parse `a.b.c.d/n`; host bits may be set. A bare address is a /32.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrintError::InvalidConfig(format!("Invalid subnet: {}", s));
        let (addr, prefix) = match s.trim().split_once('/') {
            Some((addr, prefix)) => (addr, prefix.parse::<u8>().map_err(|_| invalid())?),
            None => (s.trim(), 32),
        };
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        Subnet::new(addr, prefix).ok_or_else(invalid)
    }
}

/// Non-loopback IPv4 addresses of the local interfaces with their prefix
/// length, in interface-name order
fn interface_addresses() -> Vec<(String, Ipv4Addr, u8)> {
    let networks = Networks::new_with_refreshed_list();

    let mut interfaces: Vec<_> = networks.list().iter().collect();
    interfaces.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = Vec::new();
    for (name, data) in interfaces {
        for ip in data.ip_networks() {
            if let IpAddr::V4(v4) = ip.addr
                && !v4.is_loopback()
            {
                out.push((name.clone(), v4, ip.prefix));
            }
        }
    }
    out
}

/// Subnets of the local IPv4 interfaces worth scanning
///
/// Only networks with a prefix of at least `min_prefix_len` are returned so
/// the scan stays bounded (/23 = 512 addresses). Loopback is skipped and
/// duplicates are removed, keeping interface-name order.
pub fn local_subnets(min_prefix_len: u8) -> Vec<Subnet> {
    let mut subnets = Vec::new();
    for (name, addr, prefix) in interface_addresses() {
        if prefix < min_prefix_len {
            debug!(iface = %name, addr = %addr, prefix, "Subnet too large, skipping");
            continue;
        }
        if let Some(subnet) = Subnet::new(addr, prefix)
            && !subnets.contains(&subnet)
        {
            subnets.push(subnet);
        }
    }
    subnets
}

/// Address other machines on the LAN can most likely reach this host at
///
/// Prefers a private (RFC 1918) address, then any other non-loopback one.
pub fn lan_address() -> Option<Ipv4Addr> {
    let addrs: Vec<Ipv4Addr> = interface_addresses()
        .into_iter()
        .map(|(_, addr, _)| addr)
        .filter(|addr| !addr.is_link_local() && !addr.is_unspecified())
        .collect();
    addrs
        .iter()
        .copied()
        .find(Ipv4Addr::is_private)
        .or_else(|| addrs.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clears_host_bits() {
        let subnet: Subnet = "192.168.1.210/28".parse().unwrap();
        assert_eq!(subnet.network(), Ipv4Addr::new(192, 168, 1, 208));
        assert_eq!(subnet.prefix(), 28);
        assert_eq!(subnet.to_string(), "192.168.1.208/28");
    }

    #[test]
    fn test_hosts_skip_network_and_broadcast() {
        let subnet: Subnet = "192.168.1.208/28".parse().unwrap();
        let hosts: Vec<_> = subnet.hosts().collect();
        assert_eq!(hosts.len(), 14);
        assert_eq!(hosts.first(), Some(&Ipv4Addr::new(192, 168, 1, 209)));
        assert_eq!(hosts.last(), Some(&Ipv4Addr::new(192, 168, 1, 222)));
    }

    #[test]
    fn test_host_counts() {
        let count = |s: &str| s.parse::<Subnet>().unwrap().hosts().count();
        assert_eq!(count("10.0.0.0/23"), 510);
        assert_eq!(count("10.0.0.0/24"), 254);
        assert_eq!(count("10.0.0.0/30"), 2);
        assert_eq!(count("10.0.0.0/31"), 2);
        assert_eq!(count("10.0.0.7/32"), 1);
        assert_eq!(count("10.0.0.7"), 1);
    }

    #[test]
    fn test_hosts_ascending() {
        let subnet: Subnet = "172.16.4.0/24".parse().unwrap();
        let hosts: Vec<_> = subnet.hosts().collect();
        assert!(hosts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_invalid_subnets() {
        assert!("10.0.0.0/33".parse::<Subnet>().is_err());
        assert!("10.0.0/24".parse::<Subnet>().is_err());
        assert!("fe80::1/64".parse::<Subnet>().is_err());
    }

    #[test]
    fn test_lan_address_is_not_loopback() {
        if let Some(addr) = lan_address() {
            assert!(!addr.is_loopback());
            assert!(!addr.is_link_local());
        }
    }

    #[test]
    fn test_local_subnets_respect_prefix_bound() {
        for subnet in local_subnets(23) {
            assert!(subnet.prefix() >= 23);
            assert!(!subnet.network().is_loopback());
        }
    }
}
