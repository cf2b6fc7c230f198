//! # Service Configuration
//!
//! JSON representation of the service list and its merge rules.
//!
//! ```json
//! [{ "isEnabled": true, "name": "http", "port": 80, "transport": "tcp" }]
//! ```
//!
//! `isEnabled` defaults to `true`. A missing `transport` is taken from the
//! catalog entry with the same identity key, or TCP for custom services.
//!
//! Catalog entries are always part of a merged configuration: stored or
//! imported entries with the same identity key replace them in place, every
//! other entry is kept as a custom service after the catalog block.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ServiceDefinition, Transport, catalog};
use crate::error::SweepError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServiceRecord {
    #[serde(rename = "isEnabled", default = "enabled_by_default")]
    is_enabled: bool,
    name: String,
    port: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transport: Option<Transport>,
}

fn enabled_by_default() -> bool {
    true
}

impl TryFrom<ServiceRecord> for ServiceDefinition {
    type Error = SweepError;

    fn try_from(record: ServiceRecord) -> Result<Self, Self::Error> {
        let name: &str = record.name.trim();
        let port: u16 = u16::try_from(record.port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| SweepError::InvalidService {
                name: record.name.clone(),
                port: record.port,
            })?;

        if name.is_empty() {
            return Err(SweepError::InvalidService {
                name: record.name.clone(),
                port: record.port,
            });
        }

        let transport: Transport = record.transport.unwrap_or_else(|| {
            catalog::find(&super::identity_key(name, port))
                .map(|default| default.transport)
                .unwrap_or_default()
        });

        Ok(ServiceDefinition {
            name: name.to_string(),
            port,
            transport,
            enabled: record.is_enabled,
        })
    }
}

impl From<&ServiceDefinition> for ServiceRecord {
    fn from(service: &ServiceDefinition) -> Self {
        Self {
            is_enabled: service.enabled,
            name: service.name.clone(),
            port: i64::from(service.port),
            transport: Some(service.transport),
        }
    }
}

/// Decodes a service list without merging it with the catalog.
///
/// Records with an empty name or a port outside `1..=65535` are skipped.
pub fn decode(json: &str) -> Result<Vec<ServiceDefinition>, SweepError> {
    let records: Vec<ServiceRecord> =
        serde_json::from_str(json).map_err(|e| SweepError::ServiceConfigDecode(e.to_string()))?;

    let services = records
        .into_iter()
        .filter_map(|record| match ServiceDefinition::try_from(record) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!("Skipping service entry: {e}");
                None
            }
        })
        .collect();

    Ok(services)
}

/// Decodes a stored configuration and merges it with the catalog.
///
/// Falls back to the catalog defaults when `json` cannot be decoded.
pub fn load(json: &str) -> Vec<ServiceDefinition> {
    match decode(json) {
        Ok(stored) => merge_defaults(&stored),
        Err(e) => {
            warn!("{e}, using the default services");
            catalog::defaults().to_vec()
        }
    }
}

/// Catalog entries (replaced by stored entries with the same identity key)
/// followed by the custom entries of `stored`.
pub fn merge_defaults(stored: &[ServiceDefinition]) -> Vec<ServiceDefinition> {
    let mut merged: Vec<ServiceDefinition> = catalog::defaults()
        .iter()
        .map(|default| find_by_key(stored, &default.identity_key()).unwrap_or(default).clone())
        .collect();

    merged.extend(dedup_by_key(custom_services(stored)));
    merged
}

/// Merges imported entries into an existing configuration.
///
/// Imported entries win over existing ones for catalog identities. For
/// custom services the existing entry wins and duplicates are dropped.
pub fn merge_import(existing: &[ServiceDefinition], imported: &[ServiceDefinition]) -> Vec<ServiceDefinition> {
    let mut merged: Vec<ServiceDefinition> = catalog::defaults()
        .iter()
        .map(|default| {
            let key: String = default.identity_key();
            find_by_key(imported, &key)
                .or_else(|| find_by_key(existing, &key))
                .unwrap_or(default)
                .clone()
        })
        .collect();

    let customs = custom_services(existing).chain(custom_services(imported));
    merged.extend(dedup_by_key(customs));
    merged
}

/// Decodes `json` and merges it into `existing`.
///
/// On failure `existing` is left untouched and the error is returned.
pub fn import(existing: &[ServiceDefinition], json: &str) -> Result<Vec<ServiceDefinition>, SweepError> {
    let imported: Vec<ServiceDefinition> =
        decode(json).map_err(|e| SweepError::ImportDecode(e.to_string()))?;
    Ok(merge_import(existing, &imported))
}

/// Compact JSON, as stored by the front-end.
pub fn encode(services: &[ServiceDefinition]) -> String {
    let records: Vec<ServiceRecord> = services.iter().map(ServiceRecord::from).collect();
    serde_json::to_string(&records).unwrap_or_default()
}

pub fn default_json() -> String {
    encode(catalog::defaults())
}

/// Pretty JSON with every service.
pub fn export_all(services: &[ServiceDefinition]) -> String {
    encode_pretty(services.iter())
}

/// Pretty JSON with the services that are not part of the catalog.
pub fn export_custom(services: &[ServiceDefinition]) -> String {
    encode_pretty(custom_services(services))
}

pub fn custom_services(services: &[ServiceDefinition]) -> impl Iterator<Item = &ServiceDefinition> {
    services.iter().filter(|service| !service.is_default())
}

fn encode_pretty<'a>(services: impl Iterator<Item = &'a ServiceDefinition>) -> String {
    let records: Vec<ServiceRecord> = services.map(ServiceRecord::from).collect();
    serde_json::to_string_pretty(&records).unwrap_or_default()
}

fn find_by_key<'a>(services: &'a [ServiceDefinition], key: &str) -> Option<&'a ServiceDefinition> {
    services.iter().find(|service| service.identity_key() == key)
}

fn dedup_by_key<'a>(services: impl Iterator<Item = &'a ServiceDefinition>) -> Vec<ServiceDefinition> {
    let mut seen: HashSet<String> = HashSet::new();
    services
        .filter(|service| seen.insert(service.identity_key()))
        .cloned()
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_len() -> usize {
        catalog::defaults().len()
    }

    fn count_key(services: &[ServiceDefinition], key: &str) -> usize {
        services.iter().filter(|s| s.identity_key() == key).count()
    }

    #[test]
    fn load_invalid_json_falls_back_to_defaults() {
        assert_eq!(load("not json"), catalog::defaults().to_vec());
        assert_eq!(load("{\"name\":\"http\"}"), catalog::defaults().to_vec());
    }

    #[test]
    fn load_restores_missing_defaults() {
        let services = load(r#"[{"name":"ssh","port":22,"isEnabled":false}]"#);
        assert_eq!(services.len(), catalog_len());
        let ssh = services.iter().find(|s| s.name == "ssh").unwrap();
        assert!(!ssh.enabled);
        assert!(services.iter().filter(|s| s.name != "ssh").all(|s| s.enabled));
    }

    #[test]
    fn decode_defaults_enabled_and_transport() {
        let services = decode(r#"[{"name":"dns","port":53},{"name":"game","port":27015}]"#).unwrap();
        assert_eq!(services[0].transport, Transport::Udp);
        assert!(services[0].enabled);
        assert_eq!(services[1].transport, Transport::Tcp);
    }

    #[test]
    fn decode_reads_explicit_transport() {
        let services = decode(r#"[{"name":"syslog","port":514,"isEnabled":true,"transport":"udp"}]"#).unwrap();
        assert_eq!(services, vec![ServiceDefinition::udp("syslog", 514)]);
    }

    #[test]
    fn decode_skips_invalid_records() {
        let json = r#"[
            {"name":"zero","port":0},
            {"name":"big","port":70000},
            {"name":"  ","port":8080},
            {"name":"ok","port":8080}
        ]"#;
        let services = decode(json).unwrap();
        assert_eq!(services, vec![ServiceDefinition::tcp("ok", 8080)]);
    }

    #[test]
    fn encode_then_load_keeps_state() {
        let mut services = catalog::defaults().to_vec();
        services[0].enabled = false;
        services.push(ServiceDefinition::udp("syslog", 514));

        let loaded = load(&encode(&services));
        assert_eq!(loaded, services);
    }

    #[test]
    fn import_custom_entries_into_existing_config() {
        let mut existing = catalog::defaults().to_vec();
        existing[0].enabled = false;
        existing[1].enabled = false;
        existing.push(ServiceDefinition::tcp("plex", 32400));

        let imported_json = r#"[
            {"name":"Plex","port":32400,"isEnabled":false},
            {"name":"homeassistant","port":8123,"isEnabled":true},
            {"name":"syslog","port":514,"transport":"udp"}
        ]"#;

        let merged = import(&existing, imported_json).unwrap();

        assert_eq!(merged.len(), catalog_len() + 3);
        assert!(!merged[0].enabled);
        assert!(!merged[1].enabled);
        for default in catalog::defaults() {
            assert_eq!(count_key(&merged, &default.identity_key()), 1);
        }

        assert_eq!(count_key(&merged, "plex:32400"), 1);
        let plex = merged.iter().find(|s| s.identity_key() == "plex:32400").unwrap();
        assert_eq!(plex.name, "plex");
        assert!(plex.enabled);

        assert_eq!(count_key(&merged, "homeassistant:8123"), 1);
        assert_eq!(count_key(&merged, "syslog:514"), 1);
    }

    #[test]
    fn import_overrides_matching_catalog_entries() {
        let existing = catalog::defaults().to_vec();
        let merged = import(&existing, r#"[{"name":"SSH","port":22,"isEnabled":false}]"#).unwrap();

        assert_eq!(merged.len(), catalog_len());
        assert_eq!(count_key(&merged, "ssh:22"), 1);
        let ssh = merged.iter().find(|s| s.identity_key() == "ssh:22").unwrap();
        assert!(!ssh.enabled);
    }

    #[test]
    fn import_failure_is_reported() {
        let existing = catalog::defaults().to_vec();
        let result = import(&existing, "[{\"name\":");
        assert!(matches!(result, Err(SweepError::ImportDecode(_))));
    }

    #[test]
    fn export_custom_only_contains_custom_entries() {
        let mut services = catalog::defaults().to_vec();
        services.push(ServiceDefinition::tcp("plex", 32400));

        let exported = export_custom(&services);
        let decoded = decode(&exported).unwrap();
        assert_eq!(decoded, vec![ServiceDefinition::tcp("plex", 32400)]);
    }

    #[test]
    fn export_all_uses_sorted_keys() {
        let exported = export_all(&[ServiceDefinition::tcp("http", 80)]);
        let is_enabled = exported.find("isEnabled").unwrap();
        let name = exported.find("name").unwrap();
        let port = exported.find("port").unwrap();
        let transport = exported.find("transport").unwrap();
        assert!(is_enabled < name && name < port && port < transport);
    }
}
