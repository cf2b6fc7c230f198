//! # hostsweep engine
//!
//! Sweeps an IPv4 range for live hosts and the services they expose.
//!
//! * **[`network`]**: the [`network::Network`] seam and its system implementation.
//! * **[`liveness`]**: decides whether an address answers at all.
//! * **[`scanner`]**: probes the configured services of one address.
//! * **[`resolver`]**: hostname cache fed by service-discovery announcements.
//! * **[`orchestrator`]**: runs a whole sweep and publishes ordered results.

pub mod cancel;
pub mod liveness;
pub mod network;
pub mod orchestrator;
pub mod resolver;
pub mod scanner;

pub use network::{Network, ProbeOutcome, SystemNetwork};
pub use orchestrator::{ScanOrchestrator, ScanPhase, ScanSnapshot};
pub use resolver::{DiscoveryListener, NameCache};
