//! # Network Seam
//!
//! Every packet the engine sends goes through the [`Network`] trait so that
//! scans can be driven against a scripted network in tests.

pub mod icmp;
pub mod neighbor;
pub mod reverse;
pub mod transport;

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use hostsweep_common::services::Transport;

/// Outcome of a single connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The handshake completed (TCP) or no rejection came back (UDP).
    Open,
    /// The peer actively refused the connection.
    Closed,
    TimeoutOrError,
}

impl ProbeOutcome {
    pub fn is_open(self) -> bool {
        self == ProbeOutcome::Open
    }

    /// Any answer, including a refusal, proves the host exists.
    pub fn is_answer(self) -> bool {
        matches!(self, ProbeOutcome::Open | ProbeOutcome::Closed)
    }
}

#[async_trait]
pub trait Network: Send + Sync {
    /// Single ICMP echo. `false` on timeout, error or missing privileges.
    async fn ping(&self, address: Ipv4Addr, timeout: Duration) -> bool;

    async fn probe(
        &self,
        address: Ipv4Addr,
        port: u16,
        transport: Transport,
        timeout: Duration,
    ) -> ProbeOutcome;

    async fn reverse_lookup(&self, address: Ipv4Addr, timeout: Duration) -> Option<String>;

    async fn mac_address(&self, address: Ipv4Addr, timeout: Duration) -> Option<String>;

    /// Sends a harmless packet onto the local segment before a sweep starts.
    ///
    /// Hosts that gate local network access behind a consent prompt raise it
    /// here rather than in the middle of a scan.
    async fn trigger_local_network(&self) {}
}

/// [`Network`] backed by the operating system's sockets and tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNetwork;

#[async_trait]
impl Network for SystemNetwork {
    async fn ping(&self, address: Ipv4Addr, timeout: Duration) -> bool {
        icmp::echo(address, timeout).await
    }

    async fn probe(
        &self,
        address: Ipv4Addr,
        port: u16,
        transport: Transport,
        timeout: Duration,
    ) -> ProbeOutcome {
        transport::probe(address, port, transport, timeout).await
    }

    async fn reverse_lookup(&self, address: Ipv4Addr, timeout: Duration) -> Option<String> {
        reverse::lookup(address, timeout).await
    }

    async fn mac_address(&self, address: Ipv4Addr, timeout: Duration) -> Option<String> {
        neighbor::mac_address(address, timeout).await
    }

    async fn trigger_local_network(&self) {
        transport::broadcast_wakeup().await;
    }
}
