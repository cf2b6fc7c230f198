//! # Name Resolution
//!
//! [`NameCache`] maps IPv4 addresses to hostnames learned from DNS-SD
//! announcements. [`DiscoveryListener`] keeps it filled for the lifetime of
//! the process; the scanner only reads from it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::net::Ipv4Addr;
use std::sync::Arc;

use hostsweep_protocols::mdns::{self, MdnsRecord};
use mdns_sd::{ServiceDaemon, ServiceEvent};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shared hostname cache. Clones share the same map.
///
/// The first hostname seen for an address is kept; later announcements for
/// the same address are ignored.
#[derive(Debug, Clone, Default)]
pub struct NameCache {
    hostnames: Arc<RwLock<HashMap<Ipv4Addr, String>>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `hostname` was stored.
    pub fn update(&self, address: Ipv4Addr, hostname: impl Into<String>) -> bool {
        match self.hostnames.write().entry(address) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(hostname.into());
                true
            }
        }
    }

    pub fn lookup(&self, address: Ipv4Addr) -> Option<String> {
        self.hostnames.read().get(&address).cloned()
    }

    pub fn len(&self) -> usize {
        self.hostnames.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, record: MdnsRecord) {
        let Some(hostname) = record.hostname else {
            return;
        };
        for address in record.ips {
            if self.update(address, hostname.as_str()) {
                debug!("Cached {hostname} for {address}");
            }
        }
    }
}

/// Browses the usual DNS-SD service types and feeds resolved announcements
/// into a [`NameCache`]. Browsing stops when the listener is dropped.
pub struct DiscoveryListener {
    daemon: ServiceDaemon,
    tasks: Vec<JoinHandle<()>>,
}

impl DiscoveryListener {
    pub fn spawn(cache: NameCache) -> anyhow::Result<Self> {
        let daemon = ServiceDaemon::new()?;
        let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(mdns::SERVICE_TYPES.len());

        for &service_type in mdns::SERVICE_TYPES {
            let receiver = daemon.browse(service_type)?;
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                while let Ok(event) = receiver.recv_async().await {
                    if let ServiceEvent::ServiceResolved(info) = event {
                        let addresses = info.get_addresses_v4().into_iter().map(|ip| Ipv4Addr::from(ip.octets()));
                        let record = MdnsRecord::from_announcement(
                            info.get_hostname(),
                            info.get_fullname(),
                            service_type,
                            addresses,
                        );
                        if record.is_usable() {
                            cache.record(record);
                        }
                    }
                }
            }));
        }

        debug!("Browsing {} service types", mdns::SERVICE_TYPES.len());
        Ok(Self { daemon, tasks })
    }
}

impl Drop for DiscoveryListener {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        if let Err(e) = self.daemon.shutdown() {
            warn!("Service discovery did not shut down cleanly: {e}");
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
