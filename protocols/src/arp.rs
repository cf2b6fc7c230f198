//! # Neighbor Table
//!
//! Extracts the hardware address of an IPv4 neighbor from the two table
//! formats available without privileges:
//!
//! * `/proc/net/arp` on Linux.
//! * The output of `arp -n <ip>` elsewhere (BSD and macOS style).

use std::net::Ipv4Addr;
use std::sync::OnceLock;

use pnet::util::MacAddr;
use regex::Regex;

pub const PROC_NET_ARP: &str = "/proc/net/arp";

/// `/proc/net/arp` flag of an entry that was never resolved.
const ATF_INCOMPLETE: &str = "0x0";

static MAC_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn mac_pattern() -> Option<&'static Regex> {
    MAC_PATTERN
        .get_or_init(|| Regex::new(r"([0-9a-fA-F]{1,2}:){5}[0-9a-fA-F]{1,2}").ok())
        .as_ref()
}

/// Looks `ip` up in the content of `/proc/net/arp`.
///
/// ```text
/// IP address       HW type     Flags       HW address            Mask     Device
/// 192.168.0.1      0x1         0x2         a8:a1:59:13:41:46     *        enp9s0
/// ```
pub fn lookup_proc_table(content: &str, ip: Ipv4Addr) -> Option<String> {
    content.lines().skip(1).find_map(|line| {
        let columns: Vec<&str> = line.split_whitespace().collect();
        let [addr, _hw_type, flags, hw_addr, ..] = columns.as_slice() else {
            return None;
        };
        if addr.parse::<Ipv4Addr>().ok()? != ip || *flags == ATF_INCOMPLETE {
            return None;
        }
        normalize(hw_addr)
    })
}

/// Extracts the first hardware address found in `arp -n` output.
///
/// ```text
/// ? (192.168.1.1) at 0:1c:42:0:0:18 on en0 ifscope [ethernet]
/// ```
pub fn parse_arp_output(output: &str) -> Option<String> {
    let found = mac_pattern()?.find(output)?;
    normalize(found.as_str())
}

/// Canonical lowercase, zero-padded form. Unset addresses yield `None`.
pub fn normalize(raw: &str) -> Option<String> {
    let mac: MacAddr = raw.parse().ok()?;
    if mac == MacAddr::zero() || mac == MacAddr::broadcast() {
        return None;
    }
    Some(mac.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
