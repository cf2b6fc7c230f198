//! # IPv4 Range Model
//!
//! Parses the operator's range input into a continuous, inclusive range of IPv4
//! addresses.
//!
//! Two shapes are accepted:
//! * A single address: `192.168.1.5`
//! * A start/end pair: `192.168.1.1-192.168.1.50`
//!
//! Addresses are handled as big-endian `u32` values, so expanding a range yields
//! strictly ascending values without duplicates.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::SweepError;

const RANGE_SEPARATOR: char = '-';

/// Represents a continuous range of IPv4 addresses, inclusive.
///
/// `start_addr <= end_addr` holds for every value built through [`Ipv4Range::new`]
/// or parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    start_addr: Ipv4Addr,
    end_addr: Ipv4Addr,
}

impl Ipv4Range {
    /// Returns `None` when `start_addr` is greater than `end_addr`.
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Option<Self> {
        if u32::from(start_addr) > u32::from(end_addr) {
            return None;
        }
        Some(Self {
            start_addr,
            end_addr,
        })
    }

    pub fn single(addr: Ipv4Addr) -> Self {
        Self {
            start_addr: addr,
            end_addr: addr,
        }
    }

    /// Number of addresses in the range. Never zero.
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.end_addr)) - u64::from(u32::from(self.start_addr)) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Address at `index`, counting from the start of the range.
    pub fn get(&self, index: u64) -> Option<Ipv4Addr> {
        if index >= self.len() {
            return None;
        }
        let offset = u32::try_from(index).ok()?;
        Some(Ipv4Addr::from(u32::from(self.start_addr) + offset))
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = u32> + Clone + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        start..=end
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone + use<> {
        self.values().map(Ipv4Addr::from)
    }
}

impl FromStr for Ipv4Range {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let invalid = || SweepError::invalid_range(s);

        let parts: Vec<&str> = trimmed.split(RANGE_SEPARATOR).collect();
        match parts.as_slice() {
            [single] => {
                let addr: u32 = parse_address(single).ok_or_else(invalid)?;
                Ok(Self::single(Ipv4Addr::from(addr)))
            }
            [start, end] => {
                let start: u32 = parse_address(start).ok_or_else(invalid)?;
                let end: u32 = parse_address(end).ok_or_else(invalid)?;
                Self::new(Ipv4Addr::from(start), Ipv4Addr::from(end)).ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_addr == self.end_addr {
            write!(f, "{}", self.start_addr)
        } else {
            write!(f, "{}-{}", self.start_addr, self.end_addr)
        }
    }
}

/// Expands the range input into ascending address values.
pub fn parse_range(input: &str) -> Result<Vec<u32>, SweepError> {
    let range: Ipv4Range = input.parse()?;
    Ok(range.values().collect())
}

/// Counts the addresses `input` expands to without materialising them.
///
/// Returns `None` for every input [`parse_range`] rejects.
pub fn count_for_range(input: &str) -> Option<u64> {
    input.parse::<Ipv4Range>().ok().map(|range| range.len())
}

/// Parses a dotted quad into its big-endian `u32` value.
pub fn parse_address(s: &str) -> Option<u32> {
    let octets: Vec<&str> = s.trim().split('.').collect();
    if octets.len() != 4 {
        return None;
    }
    octets
        .iter()
        .try_fold(0u32, |acc, octet| Some((acc << 8) | u32::from(parse_octet(octet)?)))
}

pub fn format_address(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

fn parse_octet(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u8>().ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
