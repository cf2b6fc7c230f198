use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use hostsweep_protocols::arp;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Hardware address of `address` from the kernel neighbor table.
///
/// Reads `/proc/net/arp` when it exists and falls back to `arp -n` otherwise.
/// Only hosts that were recently contacted have an entry.
pub async fn mac_address(address: Ipv4Addr, limit: Duration) -> Option<String> {
    timeout(limit, lookup(address)).await.ok().flatten()
}

async fn lookup(address: Ipv4Addr) -> Option<String> {
    if let Ok(table) = tokio::fs::read_to_string(arp::PROC_NET_ARP).await {
        return arp::lookup_proc_table(&table, address);
    }

    let output = Command::new("arp")
        .arg("-n")
        .arg(address.to_string())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await;

    match output {
        Ok(output) => arp::parse_arp_output(&String::from_utf8_lossy(&output.stdout)),
        Err(e) => {
            debug!("Could not run arp for {address}: {e}");
            None
        }
    }
}
