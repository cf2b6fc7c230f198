//! Probes against real sockets on 127.0.0.1.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use hostsweep_common::config::ScanConfig;
use hostsweep_common::services::{ServiceDefinition, Transport};
use hostsweep_core::{NameCache, Network, ProbeOutcome, ScanOrchestrator, SystemNetwork};
use tokio::net::TcpListener;

const LIMIT: Duration = Duration::from_millis(1_000);

async fn unused_port() -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn listening_port_is_open() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port: u16 = listener.local_addr().unwrap().port();

    let outcome = SystemNetwork.probe(Ipv4Addr::LOCALHOST, port, Transport::Tcp, LIMIT).await;
    assert_eq!(outcome, ProbeOutcome::Open);
}

#[tokio::test]
async fn closed_port_is_refused() {
    let port: u16 = unused_port().await;
    let outcome = SystemNetwork.probe(Ipv4Addr::LOCALHOST, port, Transport::Tcp, LIMIT).await;
    assert_eq!(outcome, ProbeOutcome::Closed);
}

#[tokio::test]
async fn loopback_sweep_reports_the_listener() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let open_port: u16 = listener.local_addr().unwrap().port();
    let closed_port: u16 = unused_port().await;

    let config = ScanConfig {
        trigger_local_network: false,
        icmp_timeout: Duration::from_millis(200),
        resolve_timeout: Duration::from_millis(500),
        ..ScanConfig::default()
    };
    let orchestrator = ScanOrchestrator::new(config, Arc::new(SystemNetwork), NameCache::new());
    let services = vec![
        ServiceDefinition::tcp("probe", open_port),
        ServiceDefinition::tcp("nothing", closed_port),
    ];

    orchestrator.start("127.0.0.1", &services).unwrap();
    let snapshot = orchestrator.wait().await;

    assert_eq!(snapshot.results.len(), 1);
    let result = &snapshot.results[0];
    assert!(result.is_alive);
    assert_eq!(result.summary, "probe");
}

#[tokio::test]
#[ignore]
async fn mac_lookup_of_the_gateway() {
    let gateway = Ipv4Addr::new(192, 168, 1, 1);
    assert!(SystemNetwork.mac_address(gateway, LIMIT).await.is_some());
}
