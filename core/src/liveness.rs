//! # Liveness
//!
//! An address is alive when it answers an ICMP echo or when any discovery
//! port produces an answer. A TCP reset counts: only a live host sends one.

use std::net::Ipv4Addr;
use std::time::Duration;

use hostsweep_common::services::Transport;
use tracing::debug;

use crate::cancel::CancelFlag;
use crate::network::{Network, ProbeOutcome};

#[derive(Debug, Clone, Copy)]
pub struct LivenessTimeouts {
    pub icmp: Duration,
    pub discovery: Duration,
}

/// Echo first, then the discovery ports in order, stopping at the first answer.
pub async fn is_alive(
    network: &dyn Network,
    address: Ipv4Addr,
    discovery_ports: &[u16],
    timeouts: LivenessTimeouts,
) -> bool {
    check(network, address, discovery_ports, timeouts, &CancelFlag::new()).await
}

/// Same as [`is_alive`] but gives up between probes once `cancel` is set.
pub(crate) async fn check(
    network: &dyn Network,
    address: Ipv4Addr,
    discovery_ports: &[u16],
    timeouts: LivenessTimeouts,
    cancel: &CancelFlag,
) -> bool {
    if network.ping(address, timeouts.icmp).await {
        return true;
    }

    for &port in discovery_ports {
        if cancel.is_cancelled() {
            return false;
        }
        let outcome: ProbeOutcome = network
            .probe(address, port, Transport::Tcp, timeouts.discovery)
            .await;
        if outcome.is_answer() {
            debug!("{address} answered on port {port} ({outcome:?})");
            return true;
        }
    }
    false
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
