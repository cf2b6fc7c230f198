use std::sync::OnceLock;

use super::{ServiceDefinition, Transport};

const CATALOG: &[(&str, u16, Transport)] = &[
    ("dhcp", 67, Transport::Udp),
    ("dns", 53, Transport::Udp),
    ("ftp", 21, Transport::Tcp),
    ("imap", 143, Transport::Tcp),
    ("imaps", 993, Transport::Tcp),
    ("http", 80, Transport::Tcp),
    ("https", 443, Transport::Tcp),
    ("ldap", 389, Transport::Tcp),
    ("mqtt", 1883, Transport::Tcp),
    ("mqtts", 8883, Transport::Tcp),
    ("mysql", 3306, Transport::Tcp),
    ("netbios", 139, Transport::Tcp),
    ("ntp", 123, Transport::Udp),
    ("postgres", 5432, Transport::Tcp),
    ("rdp", 3389, Transport::Tcp),
    ("redis", 6379, Transport::Tcp),
    ("smb", 445, Transport::Tcp),
    ("smtp", 25, Transport::Tcp),
    ("ssh", 22, Transport::Tcp),
    ("telnet", 23, Transport::Tcp),
    ("tftp", 69, Transport::Udp),
    ("vnc", 5900, Transport::Tcp),
];

static DEFAULTS: OnceLock<Vec<ServiceDefinition>> = OnceLock::new();

/// The built-in services, all enabled, in catalog order.
pub fn defaults() -> &'static [ServiceDefinition] {
    DEFAULTS.get_or_init(|| {
        CATALOG
            .iter()
            .map(|&(name, port, transport)| ServiceDefinition::new(name, port, transport))
            .collect()
    })
}

/// Looks up a catalog entry by identity key.
pub fn find(identity_key: &str) -> Option<&'static ServiceDefinition> {
    defaults().iter().find(|service| service.identity_key() == identity_key)
}
