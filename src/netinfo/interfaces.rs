//! Local interface enumeration and subnet derivation.
//!
//! Interfaces are enumerated fresh on every call - nothing is cached
//! across scans. An interface is usable when it is up, not loopback, and
//! carries a hardware address (which excludes the common tun/virtual
//! cases). Only a /24 address yields a derivable sweep subnet.

use crate::types::SubnetSpec;
use ipnetwork::IpNetwork;
use pnet::datalink;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};

/// One usable local network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDescriptor {
    /// Kernel name (`eth0`, `en0`, ...).
    pub system_name: String,
    /// Human-facing name where the platform has one, else the kernel name.
    pub display_name: String,
    /// Primary IPv4 address, if the interface has a usable one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4Addr>,
    /// Prefix length of that address.
    pub prefix_len: u8,
}

impl InterfaceDescriptor {
    /// The /24 sweep subnet this interface belongs to, when derivable.
    pub fn subnet(&self) -> Option<SubnetSpec> {
        let addr = self.ipv4?;
        SubnetSpec::containing(addr, self.prefix_len)
    }
}

impl std::fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ipv4 {
            Some(addr) => write!(f, "{} - {}/{}", self.display_name, addr, self.prefix_len),
            None => write!(f, "{}", self.display_name),
        }
    }
}

/// Enumerate usable interfaces with their IPv4 addresses.
///
/// One descriptor per qualifying IPv4 address: up, not loopback, MAC
/// present; addresses that are loopback or link-local are skipped.
pub fn list_interfaces() -> Vec<InterfaceDescriptor> {
    let mut out = Vec::new();

    for iface in datalink::interfaces() {
        if !iface.is_up() || iface.is_loopback() || iface.mac.is_none() {
            continue;
        }

        let display_name = if iface.description.is_empty() {
            iface.name.clone()
        } else {
            iface.description.clone()
        };

        let mut had_ipv4 = false;
        for network in &iface.ips {
            let Some(addr) = usable_ipv4(network) else {
                continue;
            };
            had_ipv4 = true;
            out.push(InterfaceDescriptor {
                system_name: iface.name.clone(),
                display_name: display_name.clone(),
                ipv4: Some(addr),
                prefix_len: network.prefix(),
            });
        }

        if !had_ipv4 {
            out.push(InterfaceDescriptor {
                system_name: iface.name.clone(),
                display_name,
                ipv4: None,
                prefix_len: 0,
            });
        }
    }

    out
}

/// An interface address worth scanning from: IPv4, not loopback, not
/// link-local.
fn usable_ipv4(network: &IpNetwork) -> Option<Ipv4Addr> {
    let IpAddr::V4(addr) = network.ip() else {
        return None;
    };
    (!addr.is_loopback() && !addr.is_link_local()).then_some(addr)
}

/// The first /24 subnet derivable from any usable interface.
pub fn local_subnet() -> Option<SubnetSpec> {
    list_interfaces().iter().find_map(|iface| iface.subnet())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(addr: Option<Ipv4Addr>, prefix_len: u8) -> InterfaceDescriptor {
        InterfaceDescriptor {
            system_name: "eth0".to_string(),
            display_name: "eth0".to_string(),
            ipv4: addr,
            prefix_len,
        }
    }

    #[test]
    fn test_subnet_derivation_requires_slash_24() {
        let iface = descriptor(Some(Ipv4Addr::new(192, 168, 7, 23)), 24);
        assert_eq!(iface.subnet().map(|s| s.prefix()), Some("192.168.7".into()));

        let iface = descriptor(Some(Ipv4Addr::new(192, 168, 7, 23)), 16);
        assert_eq!(iface.subnet(), None);
    }

    #[test]
    fn test_subnet_derivation_requires_address() {
        assert_eq!(descriptor(None, 24).subnet(), None);
    }

    #[test]
    fn test_display() {
        let iface = descriptor(Some(Ipv4Addr::new(10, 1, 2, 3)), 24);
        assert_eq!(iface.to_string(), "eth0 - 10.1.2.3/24");
        assert_eq!(descriptor(None, 0).to_string(), "eth0");
    }

    #[test]
    fn test_enumeration_does_not_panic() {
        // Environment-dependent; just exercise the filter path.
        let _ = list_interfaces();
        let _ = local_subnet();
    }
}
