use std::time::Duration;

/// Ports used to decide liveness when no TCP service is enabled.
pub const DEFAULT_DISCOVERY_PORTS: [u16; 5] = [80, 443, 22, 3389, 5900];

/// Ranges above this size should be confirmed by the operator before scanning.
pub const LARGE_RANGE_THRESHOLD: u64 = 256;

/// Engine configuration handed to the orchestrator when a scan starts.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Upper bound of addresses probed at the same time.
    pub concurrency: usize,

    /// Timeout of the single ICMP echo sent during the liveness check.
    pub icmp_timeout: Duration,

    /// Timeout of each discovery port probe during the liveness check.
    pub discovery_timeout: Duration,

    /// Timeout of each service probe on a live host.
    pub service_timeout: Duration,

    /// Upper bound for reverse DNS and neighbor table lookups.
    pub resolve_timeout: Duration,

    /// Fallback discovery ports.
    pub discovery_ports: Vec<u16>,

    /// Sends one broadcast datagram before scanning so that platforms which
    /// gate local network access prompt the user early.
    pub trigger_local_network: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 32,
            icmp_timeout: Duration::from_millis(1_000),
            discovery_timeout: Duration::from_millis(800),
            service_timeout: Duration::from_millis(1_000),
            resolve_timeout: Duration::from_millis(3_000),
            discovery_ports: DEFAULT_DISCOVERY_PORTS.to_vec(),
            trigger_local_network: true,
        }
    }
}

impl ScanConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}
