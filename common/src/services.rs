//! # Service Model
//!
//! A service is a named `(port, transport)` pair probed on every live host.
//!
//! The built-in [`catalog`] lists well-known services. Operators can disable
//! catalog entries and add their own; [`config`] handles the JSON representation
//! of that list and the merge rules between catalog, stored and imported entries.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tcp => write!(f, "tcp"),
            Transport::Udp => write!(f, "udp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDefinition {
    pub name: String,
    pub port: u16,
    pub transport: Transport,
    pub enabled: bool,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>, port: u16, transport: Transport) -> Self {
        Self {
            name: name.into(),
            port,
            transport,
            enabled: true,
        }
    }

    pub fn tcp(name: impl Into<String>, port: u16) -> Self {
        Self::new(name, port, Transport::Tcp)
    }

    pub fn udp(name: impl Into<String>, port: u16) -> Self {
        Self::new(name, port, Transport::Udp)
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Case-insensitive `name:port` used to match services across merges.
    ///
    /// The transport is deliberately not part of the key.
    pub fn identity_key(&self) -> String {
        identity_key(&self.name, self.port)
    }

    pub fn is_default(&self) -> bool {
        catalog::find(&self.identity_key()).is_some()
    }

    /// Display label, annotating non-TCP services with their transport.
    pub fn label(&self) -> String {
        match self.transport {
            Transport::Tcp => self.name.clone(),
            other => format!("{} ({other})", self.name),
        }
    }
}

impl fmt::Display for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.name, self.port, self.transport)
    }
}

pub fn identity_key(name: &str, port: u16) -> String {
    format!("{}:{}", name.to_lowercase(), port)
}

/// Enabled services in their configured order.
pub fn enabled_services(services: &[ServiceDefinition]) -> Vec<ServiceDefinition> {
    services.iter().filter(|s| s.enabled).cloned().collect()
}

/// Discovery ports derived from the enabled services.
///
/// The TCP ports of `services` win when there is at least one; otherwise the
/// `fallback` list is used as-is.
pub fn discovery_ports(services: &[ServiceDefinition], fallback: &[u16]) -> Vec<u16> {
    let mut ports: Vec<u16> = services
        .iter()
        .filter(|s| s.enabled && s.transport == Transport::Tcp)
        .map(|s| s.port)
        .collect();

    if ports.is_empty() {
        return fallback.to_vec();
    }

    ports.sort_unstable();
    ports.dedup();
    ports
}

/// Joins the labels of `services` the way they are shown next to a host.
pub fn summary(services: &[ServiceDefinition]) -> String {
    services
        .iter()
        .map(ServiceDefinition::label)
        .collect::<Vec<String>>()
        .join(", ")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
