use std::net::Ipv4Addr;
use std::time::Duration;

use hostsweep_common::export::{self, CsvLayout};
use hostsweep_common::network::result::ScanResult;
use hostsweep_common::services::ServiceDefinition;
use hostsweep_core::{NameCache, ScanPhase, ScanSnapshot};

use crate::support::{FakeHost, FakeNetwork, orchestrator, orchestrator_with_cache};

fn ip(d: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, d)
}

fn is_ascending_prefix(results: &[ScanResult], first: Ipv4Addr) -> bool {
    let start: u32 = first.into();
    results.iter().enumerate().all(|(i, r)| r.sort_key == start + i as u32)
}

#[tokio::test]
async fn three_address_sweep_finds_the_web_server() {
    let network = FakeNetwork::new().host(ip(2), FakeHost::with_open_tcp(&[80]));
    let (orchestrator, _) = orchestrator(network, 32);

    orchestrator
        .start("10.0.0.1-10.0.0.3", &[ServiceDefinition::tcp("http", 80)])
        .unwrap();
    let snapshot: ScanSnapshot = orchestrator.wait().await;

    let summary: Vec<(Ipv4Addr, bool, Vec<&str>)> = snapshot
        .results
        .iter()
        .map(|r| (r.address, r.is_alive, r.open_services.iter().map(|s| s.name.as_str()).collect()))
        .collect();
    let expected: Vec<(Ipv4Addr, bool, Vec<&str>)> =
        vec![(ip(1), false, vec![]), (ip(2), true, vec!["http"]), (ip(3), false, vec![])];
    assert_eq!(summary, expected);
    assert_eq!(snapshot.phase, ScanPhase::Completed);
    assert_eq!(snapshot.progress_text, "IP Scan Complete");
    assert!(!snapshot.is_scanning);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn jittered_sweep_publishes_an_ascending_prefix() {
    let mut network = FakeNetwork::new().jitter(10);
    for d in (1..=60).filter(|d| d % 3 == 0) {
        network = network.host(
            Ipv4Addr::new(10, 0, 1, d),
            FakeHost {
                echo: true,
                ..FakeHost::with_open_tcp(&[22])
            },
        );
    }
    let (orchestrator, _) = orchestrator(network, 16);
    let mut updates = orchestrator.subscribe();

    orchestrator
        .start("10.0.1.1-10.0.1.60", &[ServiceDefinition::tcp("ssh", 22)])
        .unwrap();

    let first = Ipv4Addr::new(10, 0, 1, 1);
    let mut published: usize = 0;
    loop {
        {
            let snapshot = updates.borrow_and_update();
            assert!(is_ascending_prefix(&snapshot.results, first));
            assert!(snapshot.results.len() >= published);
            assert!(snapshot.completed >= snapshot.results.len());
            published = snapshot.results.len();
            if snapshot.phase == ScanPhase::Completed {
                break;
            }
        }
        if updates.changed().await.is_err() {
            break;
        }
    }

    let snapshot = orchestrator.wait().await;
    assert_eq!(snapshot.results.len(), 60);
    assert_eq!(snapshot.results.iter().filter(|r| r.is_alive).count(), 20);
    assert!(snapshot.results.iter().filter(|r| r.is_alive).all(|r| r.summary == "ssh"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stopping_keeps_the_published_prefix() {
    let network = FakeNetwork::new().jitter(30);
    let (orchestrator, _) = orchestrator(network, 4);
    let mut updates = orchestrator.subscribe();

    orchestrator.start("10.0.2.1-10.0.2.250", &[]).unwrap();
    let observed: Vec<ScanResult> = updates
        .wait_for(|snapshot| snapshot.results.len() >= 3)
        .await
        .unwrap()
        .results
        .clone();

    orchestrator.stop();
    let at_stop: ScanSnapshot = orchestrator.snapshot();
    assert!(!at_stop.is_scanning);
    assert_eq!(at_stop.phase, ScanPhase::Cancelled);
    assert!(at_stop.progress_text.is_empty());
    assert!(at_stop.results.starts_with(&observed));

    tokio::time::sleep(Duration::from_millis(400)).await;
    let later: ScanSnapshot = orchestrator.snapshot();
    assert_eq!(later.results, at_stop.results);
    assert!(later.results.len() < 250);
    assert!(is_ascending_prefix(&later.results, Ipv4Addr::new(10, 0, 2, 1)));

    orchestrator.stop();
    assert_eq!(orchestrator.snapshot(), later);
}

#[tokio::test]
async fn refused_port_marks_a_host_alive_without_services() {
    let network = FakeNetwork::new().host(
        ip(7),
        FakeHost {
            refused: [80, 443].into_iter().collect(),
            ..FakeHost::default()
        },
    );
    let (orchestrator, _) = orchestrator(network, 4);

    orchestrator
        .start("10.0.0.7", &[ServiceDefinition::tcp("http", 80), ServiceDefinition::tcp("https", 443)])
        .unwrap();
    let snapshot = orchestrator.wait().await;

    assert_eq!(snapshot.results.len(), 1);
    assert!(snapshot.results[0].is_alive);
    assert!(snapshot.results[0].open_services.is_empty());
    assert_eq!(snapshot.results[0].summary, "");
}

#[tokio::test]
async fn hostname_falls_back_to_discovery_cache() {
    let network = FakeNetwork::new()
        .host(ip(4), FakeHost { echo: true, ..FakeHost::default() })
        .host(
            ip(5),
            FakeHost {
                echo: true,
                hostname: Some("router.lan".to_string()),
                mac: Some("a8:a1:59:13:41:46".to_string()),
                ..FakeHost::default()
            },
        );
    let cache = NameCache::new();
    cache.update(ip(4), "printer.local");
    cache.update(ip(5), "ignored.local");
    let (orchestrator, _) = orchestrator_with_cache(network, 4, cache);

    orchestrator.start("10.0.0.4-10.0.0.5", &[]).unwrap();
    let snapshot = orchestrator.wait().await;

    assert_eq!(snapshot.results[0].hostname.as_deref(), Some("printer.local"));
    assert_eq!(snapshot.results[0].mac_address, None);
    assert_eq!(snapshot.results[1].hostname.as_deref(), Some("router.lan"));
    assert_eq!(snapshot.results[1].mac_address.as_deref(), Some("a8:a1:59:13:41:46"));
}

#[tokio::test]
async fn disabled_services_are_never_probed() {
    let network = FakeNetwork::new().host(
        ip(9),
        FakeHost {
            echo: true,
            ..FakeHost::with_open_tcp(&[22, 80])
        },
    );
    let (orchestrator, network) = orchestrator(network, 1);

    let services = vec![ServiceDefinition::tcp("ssh", 22), ServiceDefinition::tcp("http", 80).disabled()];
    orchestrator.start("10.0.0.9", &services).unwrap();
    let snapshot = orchestrator.wait().await;

    assert_eq!(snapshot.results[0].summary, "ssh");
    assert_eq!(network.probe_count(), 1);
}

#[tokio::test]
async fn malformed_range_reports_and_stays_idle() {
    let (orchestrator, network) = orchestrator(FakeNetwork::new(), 4);

    for input in ["", "10.0.0.256", "10.0.0.9-10.0.0.1", "10.0.0.1-10.0.0.2-10.0.0.3"] {
        assert!(orchestrator.start(input, &[]).is_err(), "{input:?} was accepted");
        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.status_message, "Invalid range. Use format 192.168.1.1-192.168.1.15");
        assert_eq!(snapshot.phase, ScanPhase::Idle);
        assert!(!snapshot.is_scanning);
    }
    assert_eq!(network.probe_count(), 0);
}

#[tokio::test]
async fn sweep_results_export_to_readable_csv() {
    let network = FakeNetwork::new().host(
        ip(2),
        FakeHost {
            hostname: Some("nas, basement".to_string()),
            ..FakeHost::with_open_tcp(&[80, 443])
        },
    );
    let (orchestrator, _) = orchestrator(network, 8);
    orchestrator
        .start(
            "10.0.0.1-10.0.0.3",
            &[ServiceDefinition::tcp("http", 80), ServiceDefinition::tcp("https", 443)],
        )
        .unwrap();
    let snapshot = orchestrator.wait().await;

    let csv_text: String = export::csv_string(&snapshot.results, CsvLayout::Full).unwrap();
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][0], "10.0.0.2");
    assert_eq!(&rows[1][1], "nas, basement");
    assert_eq!(&rows[1][3], "yes");
    assert_eq!(&rows[1][4], "http;https");
    assert_eq!(&rows[2][3], "no");
}
