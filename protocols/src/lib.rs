//! Text and record level helpers for the protocols the engine consumes but
//! does not implement: the ARP neighbor table and DNS-SD announcements.

pub mod arp;
pub mod mdns;
