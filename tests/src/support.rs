use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hostsweep_common::config::ScanConfig;
use hostsweep_common::services::Transport;
use hostsweep_core::{NameCache, Network, ProbeOutcome, ScanOrchestrator};
use parking_lot::Mutex;
use rand::Rng;

/// Scripted behavior of one address.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub echo: bool,
    pub open: HashSet<(u16, Transport)>,
    pub refused: HashSet<u16>,
    pub hostname: Option<String>,
    pub mac: Option<String>,
}

impl FakeHost {
    pub fn with_open_tcp(ports: &[u16]) -> Self {
        Self {
            open: ports.iter().map(|&p| (p, Transport::Tcp)).collect(),
            ..Self::default()
        }
    }
}

/// [`Network`] answering from a per-address script. Unknown addresses never answer.
#[derive(Default)]
pub struct FakeNetwork {
    hosts: HashMap<Ipv4Addr, FakeHost>,
    max_jitter_ms: u64,
    probes: Mutex<Vec<(Ipv4Addr, u16)>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, address: Ipv4Addr, host: FakeHost) -> Self {
        self.hosts.insert(address, host);
        self
    }

    /// Every call sleeps up to `max_jitter_ms` so completion order varies.
    pub fn jitter(mut self, max_jitter_ms: u64) -> Self {
        self.max_jitter_ms = max_jitter_ms;
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.lock().len()
    }

    async fn pause(&self) {
        if self.max_jitter_ms == 0 {
            return;
        }
        let delay: u64 = rand::rng().random_range(0..=self.max_jitter_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn ping(&self, address: Ipv4Addr, _timeout: Duration) -> bool {
        self.pause().await;
        self.hosts.get(&address).is_some_and(|h| h.echo)
    }

    async fn probe(&self, address: Ipv4Addr, port: u16, transport: Transport, _timeout: Duration) -> ProbeOutcome {
        self.pause().await;
        self.probes.lock().push((address, port));
        let Some(host) = self.hosts.get(&address) else {
            return ProbeOutcome::TimeoutOrError;
        };
        if host.open.contains(&(port, transport)) {
            ProbeOutcome::Open
        } else if host.refused.contains(&port) {
            ProbeOutcome::Closed
        } else {
            ProbeOutcome::TimeoutOrError
        }
    }

    async fn reverse_lookup(&self, address: Ipv4Addr, _timeout: Duration) -> Option<String> {
        self.hosts.get(&address).and_then(|h| h.hostname.clone())
    }

    async fn mac_address(&self, address: Ipv4Addr, _timeout: Duration) -> Option<String> {
        self.hosts.get(&address).and_then(|h| h.mac.clone())
    }
}

pub fn fast_config(concurrency: usize) -> ScanConfig {
    ScanConfig {
        icmp_timeout: Duration::from_millis(50),
        discovery_timeout: Duration::from_millis(50),
        service_timeout: Duration::from_millis(50),
        resolve_timeout: Duration::from_millis(50),
        trigger_local_network: false,
        ..ScanConfig::default()
    }
    .with_concurrency(concurrency)
}

pub fn orchestrator(network: FakeNetwork, concurrency: usize) -> (ScanOrchestrator, Arc<FakeNetwork>) {
    orchestrator_with_cache(network, concurrency, NameCache::new())
}

pub fn orchestrator_with_cache(
    network: FakeNetwork,
    concurrency: usize,
    cache: NameCache,
) -> (ScanOrchestrator, Arc<FakeNetwork>) {
    let network = Arc::new(network);
    let orchestrator = ScanOrchestrator::new(fast_config(concurrency), network.clone(), cache);
    (orchestrator, network)
}
