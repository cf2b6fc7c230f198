use std::collections::HashSet;
use std::net::Ipv4Addr;

/// DNS-SD service types whose announcements usually carry a useful hostname.
pub const SERVICE_TYPES: &[&str] = &[
    "_workstation._tcp.local.",
    "_ssh._tcp.local.",
    "_smb._tcp.local.",
    "_http._tcp.local.",
];

/// Hostname and IPv4 addresses taken from one resolved announcement.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MdnsRecord {
    pub hostname: Option<String>,
    pub ips: HashSet<Ipv4Addr>,
}

impl MdnsRecord {
    /// Builds a record from a resolved service.
    ///
    /// The announced host name wins; the instance part of the full service
    /// name is used when the host name is unusable.
    pub fn from_announcement<I>(host: &str, fullname: &str, service_type: &str, ips: I) -> Self
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        let hostname = normalize_hostname(host).or_else(|| instance_name(fullname, service_type));
        Self {
            hostname,
            ips: ips.into_iter().filter(|ip| !ip.is_unspecified()).collect(),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.hostname.is_some() && !self.ips.is_empty()
    }
}

/// Strips the trailing root dot. Empty names and `localhost` are rejected.
pub fn normalize_hostname(raw: &str) -> Option<String> {
    let trimmed: &str = raw.trim().trim_end_matches('.');
    let bare: &str = trimmed.strip_suffix(".local").unwrap_or(trimmed);
    if trimmed.is_empty() || bare.eq_ignore_ascii_case("localhost") {
        return None;
    }
    Some(trimmed.to_string())
}

fn instance_name(fullname: &str, service_type: &str) -> Option<String> {
    let instance: &str = fullname.strip_suffix(service_type)?.trim_end_matches('.');
    normalize_hostname(instance)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
