//! # Transport Probes
//!
//! Plain socket connection attempts used for liveness and service detection.
//!
//! TCP: a completed handshake is `Open`, a reset is `Closed`.
//! UDP: one byte is sent on a connected socket. An ICMP port-unreachable
//! reply surfaces as a refused receive and means `Closed`; silence or any
//! datagram within the grace window means `Open`.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use hostsweep_common::services::Transport;
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;
use tracing::debug;

use super::ProbeOutcome;

const UDP_GRACE_WINDOW: Duration = Duration::from_millis(250);
const UDP_PAYLOAD: [u8; 1] = [0];
const UDP_RECV_BUFFER: usize = 512;

/// Discard protocol port, answered by almost nothing.
const WAKEUP_PORT: u16 = 9;

pub async fn probe(address: Ipv4Addr, port: u16, transport: Transport, limit: Duration) -> ProbeOutcome {
    let target: SocketAddr = SocketAddr::V4(SocketAddrV4::new(address, port));
    match transport {
        Transport::Tcp => probe_tcp(target, limit).await,
        Transport::Udp => probe_udp(target, limit).await,
    }
}

pub async fn probe_tcp(target: SocketAddr, limit: Duration) -> ProbeOutcome {
    match timeout(limit, TcpStream::connect(target)).await {
        Ok(Ok(_stream)) => ProbeOutcome::Open,
        Ok(Err(e)) => classify(&e),
        Err(_elapsed) => ProbeOutcome::TimeoutOrError,
    }
}

pub async fn probe_udp(target: SocketAddr, limit: Duration) -> ProbeOutcome {
    let grace: Duration = (limit / 2).min(UDP_GRACE_WINDOW);
    match timeout(limit, udp_exchange(target, grace)).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => ProbeOutcome::TimeoutOrError,
    }
}

async fn udp_exchange(target: SocketAddr, grace: Duration) -> ProbeOutcome {
    let socket: UdpSocket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await {
        Ok(socket) => socket,
        Err(e) => {
            debug!("Could not bind UDP socket: {e}");
            return ProbeOutcome::TimeoutOrError;
        }
    };
    if let Err(e) = socket.connect(target).await {
        return classify(&e);
    }
    if let Err(e) = socket.send(&UDP_PAYLOAD).await {
        return classify(&e);
    }

    let mut buffer = [0u8; UDP_RECV_BUFFER];
    match timeout(grace, socket.recv(&mut buffer)).await {
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => ProbeOutcome::Closed,
        _ => ProbeOutcome::Open,
    }
}

fn classify(error: &io::Error) -> ProbeOutcome {
    match error.kind() {
        io::ErrorKind::ConnectionRefused => ProbeOutcome::Closed,
        _ => ProbeOutcome::TimeoutOrError,
    }
}

/// Fire-and-forget UDP broadcast onto the local segment. Failures are logged only.
pub async fn broadcast_wakeup() {
    let target = SocketAddrV4::new(Ipv4Addr::BROADCAST, WAKEUP_PORT);
    let result: io::Result<usize> = async {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.set_broadcast(true)?;
        socket.send_to(&UDP_PAYLOAD, target).await
    }
    .await;

    if let Err(e) = result {
        debug!("Local network wakeup to {target} failed: {e}");
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
