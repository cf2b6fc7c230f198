use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

const ECHO_PAYLOAD: [u8; 8] = [0; 8];

/// One echo request. Raw or datagram ICMP sockets may be unavailable to
/// unprivileged users; that reads as "no reply".
pub async fn echo(address: Ipv4Addr, limit: Duration) -> bool {
    match timeout(limit, surge_ping::ping(IpAddr::V4(address), &ECHO_PAYLOAD)).await {
        Ok(Ok((_packet, rtt))) => {
            debug!("{address} answered echo in {rtt:?}");
            true
        }
        Ok(Err(e)) => {
            debug!("Echo to {address} failed: {e}");
            false
        }
        Err(_elapsed) => false,
    }
}
