use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, bail};
use colored::*;
use hostsweep_common::error::SweepError;
use hostsweep_common::services::{self, ServiceDefinition, Transport, catalog, config};
use tracing::info;

use crate::commands::ServicesAction;
use crate::terminal::{colors, format, print};

/// Stored configuration merged with the catalog. A missing file yields the catalog.
pub fn load(path: &Path) -> anyhow::Result<Vec<ServiceDefinition>> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(config::load(&json)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(catalog::defaults().to_vec()),
        Err(e) => Err(e).with_context(|| format!("Could not read {}", path.display())),
    }
}

pub fn save(path: &Path, services: &[ServiceDefinition]) -> anyhow::Result<()> {
    fs::write(path, config::encode(services)).with_context(|| format!("Could not write {}", path.display()))
}

pub fn run(action: ServicesAction, path: &Path) -> anyhow::Result<()> {
    let mut services: Vec<ServiceDefinition> = load(path)?;

    match action {
        ServicesAction::List => {
            list(&services);
            return Ok(());
        }
        ServicesAction::Export { custom, out } => {
            let json: String = if custom {
                config::export_custom(&services)
            } else {
                config::export_all(&services)
            };
            match out {
                Some(file) => {
                    fs::write(&file, json).with_context(|| format!("Could not write {}", file.display()))?;
                    info!("Exported services to {}", file.display());
                }
                None => json.lines().for_each(print::print),
            }
            return Ok(());
        }
        ServicesAction::Import { file } => {
            let json: String =
                fs::read_to_string(&file).with_context(|| format!("Could not read {}", file.display()))?;
            services = config::import(&services, &json)?;
            info!("Imported {}", file.display());
        }
        ServicesAction::Enable { service } => set_enabled(&mut services, &parse_key(&service)?, true)?,
        ServicesAction::Disable { service } => set_enabled(&mut services, &parse_key(&service)?, false)?,
        ServicesAction::Add { name, port, udp } => {
            let transport: Transport = if udp { Transport::Udp } else { Transport::Tcp };
            add(&mut services, &name, port, transport)?;
        }
        ServicesAction::Remove { service } => remove(&mut services, &parse_key(&service)?)?,
    }

    save(path, &services)?;
    list(&services);
    Ok(())
}

fn list(services: &[ServiceDefinition]) {
    print::header("configured services");
    for service in services {
        print::print(&format::service_line(service));
    }
    let enabled: usize = services.iter().filter(|s| s.enabled).count();
    print::fat_separator();
    print::centerln(
        &format!("{} of {} services enabled", enabled.to_string().green().bold(), services.len())
            .color(colors::TEXT_DEFAULT)
            .to_string(),
    );
}

/// `NAME:PORT` to an identity key.
pub fn parse_key(input: &str) -> anyhow::Result<String> {
    let (name, port) = input
        .rsplit_once(':')
        .with_context(|| format!("Expected NAME:PORT, got {input:?}"))?;
    let port: u16 = port
        .trim()
        .parse()
        .with_context(|| format!("Invalid port in {input:?}"))?;
    Ok(services::identity_key(name.trim(), port))
}

pub fn set_enabled(services: &mut [ServiceDefinition], key: &str, enabled: bool) -> anyhow::Result<()> {
    let service: &mut ServiceDefinition = services
        .iter_mut()
        .find(|s| s.identity_key() == key)
        .with_context(|| format!("No service matches {key}"))?;
    service.enabled = enabled;
    Ok(())
}

pub fn add(services: &mut Vec<ServiceDefinition>, name: &str, port: u16, transport: Transport) -> anyhow::Result<()> {
    let name: &str = name.trim();
    if name.is_empty() || port == 0 {
        return Err(SweepError::InvalidService {
            name: name.to_string(),
            port: i64::from(port),
        }
        .into());
    }

    let candidate = ServiceDefinition::new(name, port, transport);
    if services.iter().any(|s| s.identity_key() == candidate.identity_key()) {
        bail!("{candidate} is already configured");
    }
    services.push(candidate);
    Ok(())
}

/// Only custom services can be removed; catalog entries are disabled instead.
pub fn remove(services: &mut Vec<ServiceDefinition>, key: &str) -> anyhow::Result<()> {
    let index: usize = services
        .iter()
        .position(|s| s.identity_key() == key)
        .with_context(|| format!("No service matches {key}"))?;
    if services[index].is_default() {
        bail!("{} is part of the catalog, disable it instead", services[index]);
    }
    services.remove(index);
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
