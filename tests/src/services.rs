//! Service configuration lifecycle: stored JSON, import and export.

use hostsweep_common::error::SweepError;
use hostsweep_common::services::{ServiceDefinition, Transport, catalog, config, discovery_ports};

#[test]
fn stored_configuration_survives_encode_and_load() {
    let mut services: Vec<ServiceDefinition> = catalog::defaults().to_vec();
    services.iter_mut().filter(|s| s.name == "ftp").for_each(|s| s.enabled = false);
    services.push(ServiceDefinition::udp("syslog", 514));

    let loaded = config::load(&config::encode(&services));
    assert_eq!(loaded, services);
}

#[test]
fn import_overrides_catalog_and_appends_customs() {
    let existing: Vec<ServiceDefinition> = config::load(&config::default_json());
    let imported = r#"[
        {"name": "ssh", "port": 22, "isEnabled": false},
        {"name": "grafana", "port": 3000},
        {"name": "GRAFANA", "port": 3000, "isEnabled": false}
    ]"#;

    let merged = config::import(&existing, imported).unwrap();
    let ssh = merged.iter().find(|s| s.identity_key() == "ssh:22").unwrap();
    assert!(!ssh.enabled);

    let customs: Vec<&ServiceDefinition> = config::custom_services(&merged).collect();
    assert_eq!(customs.len(), 1);
    assert_eq!(customs[0].name, "grafana");
    assert!(customs[0].enabled);
    assert_eq!(merged.len(), catalog::defaults().len() + 1);
}

#[test]
fn failed_import_is_reported() {
    let existing = catalog::defaults().to_vec();
    assert!(matches!(config::import(&existing, "{ not json"), Err(SweepError::ImportDecode(_))));
}

#[test]
fn custom_export_round_trips_through_import() {
    let mut services = catalog::defaults().to_vec();
    services.push(ServiceDefinition::new("minecraft", 25565, Transport::Tcp));

    let exported: String = config::export_custom(&services);
    let restored = config::import(catalog::defaults(), &exported).unwrap();
    assert_eq!(restored, services);
}

#[test]
fn discovery_ports_come_from_enabled_tcp_services() {
    let services = config::load(&config::default_json());
    let ports: Vec<u16> = discovery_ports(&services, &[80]);
    assert!(ports.contains(&22));
    assert!(!ports.contains(&53));
    assert!(ports.windows(2).all(|pair| pair[0] < pair[1]));
}
