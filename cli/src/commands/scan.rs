use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use colored::*;
use dialoguer::Confirm;
use hostsweep_common::config::{LARGE_RANGE_THRESHOLD, ScanConfig};
use hostsweep_common::export::{self, CsvLayout};
use hostsweep_common::network::{interface, range};
use hostsweep_common::network::result::ScanResult;
use hostsweep_common::services::ServiceDefinition;
use hostsweep_core::{DiscoveryListener, NameCache, ScanOrchestrator, ScanPhase, ScanSnapshot, SystemNetwork};
use tracing::{info, warn};

use crate::commands::ScanArgs;
use crate::commands::services;
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn scan(args: ScanArgs, services_path: &Path) -> anyhow::Result<()> {
    let range_input: String = resolve_range(&args)?;
    if !confirm_range(&range_input, args.yes)? {
        print::print_status("Scan aborted");
        return Ok(());
    }

    let services: Vec<ServiceDefinition> = services::load(services_path)?;
    let cache = NameCache::new();
    let _listener: Option<DiscoveryListener> = if args.no_mdns {
        None
    } else {
        match DiscoveryListener::spawn(cache.clone()) {
            Ok(listener) => Some(listener),
            Err(e) => {
                warn!("Service discovery unavailable: {e}");
                None
            }
        }
    };

    let config: ScanConfig = ScanConfig::default().with_concurrency(args.concurrency);
    let orchestrator = ScanOrchestrator::new(config, Arc::new(SystemNetwork), cache);
    let mut updates = orchestrator.subscribe();

    let start_time: Instant = Instant::now();
    orchestrator.start(&range_input, &services)?;
    print::header(&format!("scanning {range_input}"));
    spinner::start(&orchestrator.snapshot().progress_text);

    let mut renderer = Renderer::new(!args.no_mac, ResultFilter::from_args(&args));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted: bool = false;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot: ScanSnapshot = updates.borrow_and_update().clone();
                renderer.render(&snapshot);
                if !snapshot.is_scanning {
                    break;
                }
            }
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                orchestrator.stop();
            }
        }
    }

    spinner::finish();
    let snapshot: ScanSnapshot = orchestrator.snapshot();
    renderer.render(&snapshot);
    scan_ends(&snapshot, &renderer, start_time.elapsed());

    if let Some(path) = &args.csv {
        let layout: CsvLayout = if args.no_mac { CsvLayout::WithoutMac } else { CsvLayout::Full };
        write_csv(path, &snapshot.results, layout)?;
    }
    Ok(())
}

fn resolve_range(args: &ScanArgs) -> anyhow::Result<String> {
    if args.subnet {
        let Some(subnet) = interface::current_subnet_range() else {
            bail!("No local IPv4 subnet found, pass a range instead");
        };
        return Ok(subnet.to_string());
    }
    args.range
        .as_deref()
        .map(str::trim)
        .map(str::to_string)
        .context("A range or --subnet is required")
}

/// Asks before sweeping ranges larger than [`LARGE_RANGE_THRESHOLD`].
fn confirm_range(range_input: &str, assume_yes: bool) -> anyhow::Result<bool> {
    let Some(count) = range::count_for_range(range_input) else {
        return Ok(true);
    };
    if !needs_confirmation(count, assume_yes) {
        return Ok(true);
    }
    let answer: bool = Confirm::new()
        .with_prompt(format!("{count} addresses will be scanned. Continue?"))
        .default(false)
        .interact()?;
    Ok(answer)
}

fn needs_confirmation(count: u64, assume_yes: bool) -> bool {
    count > LARGE_RANGE_THRESHOLD && !assume_yes
}

/// Which results get printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ResultFilter {
    #[default]
    Alive,
    All,
    WithServices,
}

impl ResultFilter {
    fn from_args(args: &ScanArgs) -> Self {
        if args.all {
            Self::All
        } else if args.with_services {
            Self::WithServices
        } else {
            Self::Alive
        }
    }

    fn shows(self, result: &ScanResult) -> bool {
        match self {
            Self::Alive => result.is_alive,
            Self::All => true,
            Self::WithServices => !result.open_services.is_empty(),
        }
    }
}

/// Prints newly published results as they arrive.
struct Renderer {
    printed: usize,
    shown: usize,
    alive: usize,
    show_mac: bool,
    filter: ResultFilter,
}

impl Renderer {
    fn new(show_mac: bool, filter: ResultFilter) -> Self {
        Self {
            printed: 0,
            shown: 0,
            alive: 0,
            show_mac,
            filter,
        }
    }

    fn render(&mut self, snapshot: &ScanSnapshot) {
        if snapshot.results.len() < self.printed {
            self.printed = 0;
        }
        for result in &snapshot.results[self.printed..] {
            if result.is_alive {
                self.alive += 1;
            }
            if self.filter.shows(result) {
                self.print_host(result);
            }
        }
        self.printed = snapshot.results.len();

        if snapshot.is_scanning {
            spinner::report_scan_progress(&snapshot.progress_text, self.alive);
        }
    }

    fn print_host(&mut self, result: &ScanResult) {
        if self.shown > 0 {
            mprint!();
        }
        let fallback: &str = if result.is_alive { "No hostname" } else { "No response" };
        let hostname: &str = result.hostname.as_deref().unwrap_or(fallback);
        print::tree_head(self.shown, hostname);
        print::as_tree_one_level(format::result_details(result, self.show_mac));
        self.shown += 1;
    }
}

fn scan_ends(snapshot: &ScanSnapshot, renderer: &Renderer, total_time: Duration) {
    if renderer.shown == 0 {
        print::no_results();
    }

    let active_hosts: ColoredString = format!("{} alive hosts", renderer.alive).bold().green();
    let scanned: ColoredString = format!("{}/{}", snapshot.results.len(), snapshot.total).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let verdict: &str = match snapshot.phase {
        ScanPhase::Cancelled => "Scan Stopped",
        _ => "Scan Complete",
    };
    let output: String = format!("{verdict}: {active_hosts} among {scanned} addresses in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    print::fat_separator();
    print::centerln(&output);
}

fn write_csv(path: &Path, results: &[ScanResult], layout: CsvLayout) -> anyhow::Result<()> {
    let csv: String = export::csv_string(results, layout)?;
    fs::write(path, csv).with_context(|| format!("Could not write {}", path.display()))?;
    info!("Wrote {} rows to {}", results.len(), path.display());
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
