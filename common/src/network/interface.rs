//! # Local Interfaces
//!
//! Lists the IPv4 interfaces of this machine and derives the host range of
//! their subnet, used to prefill the range input.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

use super::range::Ipv4Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInterface {
    pub name: String,
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl LocalInterface {
    /// Host addresses of the subnet, network and broadcast excluded.
    ///
    /// `None` when the subnet has no room for at least two hosts (/31, /32).
    pub fn subnet_range(&self) -> Option<Ipv4Range> {
        let mask: u32 = self.netmask.into();
        let network: u32 = u32::from(self.address) & mask;
        let broadcast: u32 = network | !mask;

        let start: u32 = network.checked_add(1)?;
        let end: u32 = broadcast.checked_sub(1)?;
        if start >= end {
            return None;
        }
        Ipv4Range::new(Ipv4Addr::from(start), Ipv4Addr::from(end))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// Loopback interfaces are never scanned.
    IsLoopback,
    /// The interface has no IPv4 address outside the link-local block.
    NoUsableIpv4,
}

/// Up, non-loopback IPv4 interfaces sorted by name.
pub fn local_interfaces() -> Vec<LocalInterface> {
    to_local_interfaces(&datalink::interfaces())
}

/// Subnet range of the first local interface.
pub fn current_subnet_range() -> Option<Ipv4Range> {
    local_interfaces().iter().find_map(LocalInterface::subnet_range)
}

fn to_local_interfaces(interfaces: &[NetworkInterface]) -> Vec<LocalInterface> {
    let mut locals: Vec<LocalInterface> = interfaces
        .iter()
        .filter(|interface| is_viable(interface).is_ok())
        .flat_map(|interface| {
            interface.ips.iter().filter_map(move |net| match net {
                IpNetwork::V4(v4) if !v4.ip().is_link_local() => Some(LocalInterface {
                    name: interface.name.clone(),
                    address: v4.ip(),
                    netmask: v4.mask(),
                }),
                _ => None,
            })
        })
        .collect();

    locals.sort_by(|a, b| a.name.cmp(&b.name));
    locals
}

fn is_viable(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    let has_ipv4 = interface.ips.iter().any(|net| match net {
        IpNetwork::V4(v4) => !v4.ip().is_link_local(),
        IpNetwork::V6(_) => false,
    });
    if !has_ipv4 {
        return Err(ViabilityError::NoUsableIpv4);
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::ipnetwork::{Ipv4Network, Ipv6Network};
    use pnet::util::MacAddr;

    const IFF_UP: u32 = 1;
    const IFF_BROADCAST: u32 = 1 << 1;
    const IFF_LOOPBACK: u32 = 1 << 3;

    fn ni(name: &str, ips: Vec<IpNetwork>, flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: "An interface".to_string(),
            index: 0,
            mac: Some(MacAddr(0x1, 0x2, 0x3, 0x4, 0x5, 0x6)),
            ips,
            flags,
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, prefix: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), prefix).unwrap())
    }

    fn v6(s: &str, prefix: u8) -> IpNetwork {
        IpNetwork::V6(Ipv6Network::new(s.parse().unwrap(), prefix).unwrap())
    }

    fn local(address: Ipv4Addr, netmask: Ipv4Addr) -> LocalInterface {
        LocalInterface {
            name: "eth0".to_string(),
            address,
            netmask,
        }
    }

    #[test]
    fn subnet_range_excludes_network_and_broadcast() {
        let iface = local(Ipv4Addr::new(192, 168, 20, 17), Ipv4Addr::new(255, 255, 255, 0));
        let range = iface.subnet_range().unwrap();
        assert_eq!(range.to_string(), "192.168.20.1-192.168.20.254");
    }

    #[test]
    fn subnet_range_rejects_tiny_subnets() {
        let p31 = local(Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(255, 255, 255, 254));
        let p32 = local(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(255, 255, 255, 255));
        assert!(p31.subnet_range().is_none());
        assert!(p32.subnet_range().is_none());
    }

    #[test]
    fn subnet_range_handles_wide_masks() {
        let iface = local(Ipv4Addr::new(10, 1, 2, 3), Ipv4Addr::new(255, 0, 0, 0));
        let range = iface.subnet_range().unwrap();
        assert_eq!(range.to_string(), "10.0.0.1-10.255.255.254");
    }

    #[test]
    fn viability_rejects_down_and_loopback() {
        let down = ni("eth0", vec![v4(192, 168, 1, 2, 24)], IFF_BROADCAST);
        let lo = ni("lo", vec![v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK);
        assert_eq!(is_viable(&down), Err(ViabilityError::IsDown));
        assert_eq!(is_viable(&lo), Err(ViabilityError::IsLoopback));
    }

    #[test]
    fn viability_requires_usable_ipv4() {
        let v6_only = ni("wg0", vec![v6("fe80::1", 64)], IFF_UP);
        let link_local = ni("eth1", vec![v4(169, 254, 3, 4, 16)], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable(&v6_only), Err(ViabilityError::NoUsableIpv4));
        assert_eq!(is_viable(&link_local), Err(ViabilityError::NoUsableIpv4));
    }

    #[test]
    fn local_interfaces_are_sorted_by_name() {
        let interfaces = vec![
            ni("wlan0", vec![v4(192, 168, 1, 42, 24), v6("fe80::36cf", 64)], IFF_UP | IFF_BROADCAST),
            ni("lo", vec![v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK),
            ni("enp9s0", vec![v4(192, 168, 0, 32, 24)], IFF_UP | IFF_BROADCAST),
        ];

        let locals = to_local_interfaces(&interfaces);
        let names: Vec<&str> = locals.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["enp9s0", "wlan0"]);
        assert_eq!(locals[0].netmask, Ipv4Addr::new(255, 255, 255, 0));
    }
}
