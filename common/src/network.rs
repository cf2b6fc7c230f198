//! # Network Model
//!
//! * [`range`]: textual IPv4 ranges and their expansion.
//! * [`interface`]: local IPv4 interfaces and their subnets.
//! * [`result`]: the per-address outcome of a scan.

pub mod interface;
pub mod range;
pub mod result;
