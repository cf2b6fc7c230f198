use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tokio::task;
use tokio::time::timeout;
use tracing::debug;

/// PTR lookup through the system resolver.
///
/// The resolver call blocks, so it runs on the blocking pool. A lookup that
/// outlives `limit` is abandoned and its late answer ignored.
pub async fn lookup(address: Ipv4Addr, limit: Duration) -> Option<String> {
    let ip = IpAddr::V4(address);
    let handle = task::spawn_blocking(move || dns_lookup::lookup_addr(&ip));

    match timeout(limit, handle).await {
        Ok(Ok(Ok(name))) => usable_name(&name, address),
        Ok(Ok(Err(e))) => {
            debug!("Reverse lookup of {address} failed: {e}");
            None
        }
        Ok(Err(join_error)) => {
            debug!("Reverse lookup task for {address} failed: {join_error}");
            None
        }
        Err(_elapsed) => None,
    }
}

/// The system resolver echoes the numeric address back when no PTR exists.
fn usable_name(name: &str, address: Ipv4Addr) -> Option<String> {
    let name: &str = name.trim().trim_end_matches('.');
    if name.is_empty() || name.parse::<Ipv4Addr>().is_ok_and(|parsed| parsed == address) {
        return None;
    }
    Some(name.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
