//! # hostsweep common
//!
//! Shared, IO-free building blocks used by the scan engine and its consumers:
//!
//! * **[`network`]**: address ranges, local interfaces and the scan result model.
//! * **[`services`]**: the service catalog and the JSON service configuration.
//! * **[`export`]**: CSV rendering of scan results.
//! * **[`config`]**: the explicit engine configuration.
//! * **[`error`]**: errors surfaced to the operator.

pub mod config;
pub mod error;
pub mod export;
pub mod network;
pub mod services;
