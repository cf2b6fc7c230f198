//! # Host Scanner
//!
//! Turns one address into a [`ScanResult`]: liveness first, then every enabled
//! service, then hostname and hardware address. Dead hosts stop after the
//! liveness step.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use hostsweep_common::config::ScanConfig;
use hostsweep_common::network::result::ScanResult;
use hostsweep_common::services::{self, ServiceDefinition};
use tracing::debug;

use crate::cancel::CancelFlag;
use crate::liveness::{self, LivenessTimeouts};
use crate::network::{Network, ProbeOutcome};
use crate::resolver::NameCache;

/// Upper bound on simultaneous service probes against a single host.
const SERVICE_PROBES_PER_HOST: usize = 8;

pub struct ServiceScanner {
    network: Arc<dyn Network>,
    cache: NameCache,
    services: Vec<ServiceDefinition>,
    discovery_ports: Vec<u16>,
    liveness: LivenessTimeouts,
    service_timeout: Duration,
    resolve_timeout: Duration,
}

impl ServiceScanner {
    /// Disabled entries in `services` are ignored.
    ///
    /// Discovery ports are the enabled TCP services, or the configured
    /// fallback list when none are enabled.
    pub fn new(
        network: Arc<dyn Network>,
        cache: NameCache,
        config: &ScanConfig,
        services: &[ServiceDefinition],
    ) -> Self {
        let enabled: Vec<ServiceDefinition> = services::enabled_services(services);
        let discovery_ports: Vec<u16> = services::discovery_ports(&enabled, &config.discovery_ports);
        Self {
            network,
            cache,
            services: enabled,
            discovery_ports,
            liveness: LivenessTimeouts {
                icmp: config.icmp_timeout,
                discovery: config.discovery_timeout,
            },
            service_timeout: config.service_timeout,
            resolve_timeout: config.resolve_timeout,
        }
    }

    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    pub fn discovery_ports(&self) -> &[u16] {
        &self.discovery_ports
    }

    pub async fn scan(&self, address: Ipv4Addr) -> ScanResult {
        self.scan_until_cancelled(address, &CancelFlag::new())
            .await
            .unwrap_or_else(|| ScanResult::unresponsive(address))
    }

    /// `None` once `cancel` is observed between two phases.
    pub async fn scan_until_cancelled(&self, address: Ipv4Addr, cancel: &CancelFlag) -> Option<ScanResult> {
        if cancel.is_cancelled() {
            return None;
        }

        let alive: bool = liveness::check(
            self.network.as_ref(),
            address,
            &self.discovery_ports,
            self.liveness,
            cancel,
        )
        .await;
        if cancel.is_cancelled() {
            return None;
        }
        if !alive {
            return Some(ScanResult::unresponsive(address));
        }

        let open_services: Vec<ServiceDefinition> = self.open_services(address).await;
        if cancel.is_cancelled() {
            return None;
        }

        let (hostname, mac_address) = tokio::join!(
            self.hostname(address),
            self.network.mac_address(address, self.resolve_timeout)
        );
        if cancel.is_cancelled() {
            return None;
        }

        debug!("{address} is alive with {} open services", open_services.len());
        Some(ScanResult::alive(address, hostname, mac_address, open_services))
    }

    /// Probes every service concurrently, keeping catalog order in the result.
    async fn open_services(&self, address: Ipv4Addr) -> Vec<ServiceDefinition> {
        let outcomes: Vec<ProbeOutcome> = stream::iter(self.services.iter().map(|s| (s.port, s.transport)).collect::<Vec<_>>())
            .map(|(port, transport)| self.network.probe(address, port, transport, self.service_timeout))
            .buffered(SERVICE_PROBES_PER_HOST)
            .collect()
            .await;

        self.services
            .iter()
            .zip(outcomes)
            .filter(|(_, outcome)| outcome.is_open())
            .map(|(service, _)| service.clone())
            .collect()
    }

    /// Reverse DNS first, then whatever service discovery has announced.
    async fn hostname(&self, address: Ipv4Addr) -> Option<String> {
        match self.network.reverse_lookup(address, self.resolve_timeout).await {
            Some(name) => Some(name),
            None => self.cache.lookup(address),
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
