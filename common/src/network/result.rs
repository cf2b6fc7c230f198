use std::net::Ipv4Addr;

use crate::services::{self, ServiceDefinition};

/// Outcome of scanning one address.
///
/// Built once when the address has been fully probed and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub address: Ipv4Addr,
    pub sort_key: u32,
    pub hostname: Option<String>,
    pub mac_address: Option<String>,
    pub is_alive: bool,
    pub open_services: Vec<ServiceDefinition>,
    pub summary: String,
}

impl ScanResult {
    /// Result for an address that did not answer any liveness probe.
    pub fn unresponsive(address: Ipv4Addr) -> Self {
        Self {
            address,
            sort_key: address.into(),
            hostname: None,
            mac_address: None,
            is_alive: false,
            open_services: Vec::new(),
            summary: String::new(),
        }
    }

    pub fn alive(
        address: Ipv4Addr,
        hostname: Option<String>,
        mac_address: Option<String>,
        open_services: Vec<ServiceDefinition>,
    ) -> Self {
        let summary: String = services::summary(&open_services);
        Self {
            address,
            sort_key: address.into(),
            hostname,
            mac_address,
            is_alive: true,
            open_services,
            summary,
        }
    }
}
