//! Cross-crate scenarios: full sweeps against scripted networks, real
//! loopback probes and the service configuration lifecycle.

#[cfg(test)]
mod support;

#[cfg(test)]
mod sweep;

#[cfg(test)]
mod loopback;

#[cfg(test)]
mod services;
