use colored::*;
use hostsweep_common::network::interface::LocalInterface;
use hostsweep_common::network::result::ScanResult;
use hostsweep_common::services::ServiceDefinition;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn result_details(result: &ScanResult, show_mac: bool) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![("IPv4".to_string(), result.address.to_string().color(colors::IPV4_ADDR))];

    if show_mac {
        if let Some(mac) = &result.mac_address {
            details.push(("MAC".to_string(), mac.color(colors::MAC_ADDR)));
        }
    }

    let services: ColoredString = if result.summary.is_empty() {
        "none detected".color(colors::SEPARATOR)
    } else {
        result.summary.color(colors::SERVICE)
    };
    details.push(("Service".to_string(), services));
    details
}

pub fn interface_details(interface: &LocalInterface) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("IPv4".to_string(), interface.address.to_string().color(colors::IPV4_ADDR)),
        ("Mask".to_string(), interface.netmask.to_string().color(colors::TEXT_DEFAULT)),
    ];
    if let Some(range) = interface.subnet_range() {
        details.push(("Range".to_string(), range.to_string().color(colors::ACCENT)));
    }
    details
}

pub fn service_line(service: &ServiceDefinition) -> String {
    let state: ColoredString = if service.enabled { "on ".green() } else { "off".color(colors::DISABLED) };
    let origin: ColoredString = if service.is_default() { "".normal() } else { " custom".italic().color(colors::ACCENT) };
    format!(
        "[{state}] {}{}{}",
        format!("{:<12}", service.name).color(colors::PRIMARY),
        format!("{:>5}/{}", service.port, service.transport).color(colors::TEXT_DEFAULT),
        origin
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
