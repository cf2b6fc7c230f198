//! # Scan Orchestrator
//!
//! Runs one sweep at a time over an address range.
//!
//! Addresses are scanned by a bounded pool of workers pulling from a shared
//! cursor. Results come back in completion order and pass through a
//! [`ReorderBuffer`], so the published list always holds a contiguous prefix
//! of the range in ascending order.
//!
//! State is published through a [`watch`] channel. Every write re-checks the
//! scan's [`CancelFlag`] while holding the channel lock, which keeps a stopped
//! or superseded scan from touching the state of its successor.

pub mod progress;
pub mod reorder;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hostsweep_common::config::ScanConfig;
use hostsweep_common::error::SweepError;
use hostsweep_common::network::range::Ipv4Range;
use hostsweep_common::network::result::ScanResult;
use hostsweep_common::services::ServiceDefinition;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::network::Network;
use crate::resolver::NameCache;
use crate::scanner::ServiceScanner;

use progress::ScanProgress;
use reorder::ReorderBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Everything an observer needs to render the current scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSnapshot {
    /// Contiguous, ascending prefix of the scanned range.
    pub results: Vec<ScanResult>,
    pub progress_text: String,
    /// Non-empty only after a rejected range.
    pub status_message: String,
    pub is_scanning: bool,
    pub phase: ScanPhase,
    pub completed: usize,
    pub total: usize,
}

pub struct ScanOrchestrator {
    config: ScanConfig,
    network: Arc<dyn Network>,
    cache: NameCache,
    state: Arc<watch::Sender<ScanSnapshot>>,
    active: Mutex<Option<CancelFlag>>,
}

impl ScanOrchestrator {
    pub fn new(config: ScanConfig, network: Arc<dyn Network>, cache: NameCache) -> Self {
        let (state, _) = watch::channel(ScanSnapshot::default());
        Self {
            config,
            network,
            cache,
            state: Arc::new(state),
            active: Mutex::new(None),
        }
    }

    /// Starts a sweep of `range_input`, cancelling any sweep in progress.
    ///
    /// A malformed range leaves the orchestrator idle with the error as its
    /// status message. Must be called from within a Tokio runtime.
    pub fn start(&self, range_input: &str, services: &[ServiceDefinition]) -> Result<(), SweepError> {
        let parsed: Result<(Ipv4Range, usize), SweepError> = sweep_range(range_input);

        // Held until the new state is published, so overlapping calls to
        // `start` and `stop` are serialized.
        let mut active = self.active.lock();
        if let Some(previous) = active.take() {
            previous.cancel();
            debug!("Superseding the running sweep");
        }

        let (range, total) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Rejected range {range_input:?}");
                self.state.send_replace(ScanSnapshot {
                    status_message: e.to_string(),
                    ..ScanSnapshot::default()
                });
                return Err(e);
            }
        };

        let cancel = CancelFlag::new();
        *active = Some(cancel.clone());
        self.state.send_replace(ScanSnapshot {
            progress_text: progress::queued_text(total),
            is_scanning: true,
            phase: ScanPhase::Running,
            total,
            ..ScanSnapshot::default()
        });
        drop(active);
        info!("Scanning {range} ({total} addresses)");

        let scanner = Arc::new(ServiceScanner::new(
            self.network.clone(),
            self.cache.clone(),
            &self.config,
            services,
        ));
        let sweep = Sweep {
            scanner,
            network: self.network.clone(),
            range,
            total,
            concurrency: self.config.concurrency.max(1),
            trigger_local_network: self.config.trigger_local_network,
            cancel,
            state: self.state.clone(),
        };
        tokio::spawn(sweep.run());
        Ok(())
    }

    /// Cancels the running sweep. Results published so far are kept.
    ///
    /// Calling it while idle does nothing.
    pub fn stop(&self) {
        let mut active = self.active.lock();
        let Some(cancel) = active.take() else {
            return;
        };
        cancel.cancel();

        let stopped: bool = self.state.send_if_modified(|snapshot| {
            if !snapshot.is_scanning {
                return false;
            }
            snapshot.is_scanning = false;
            snapshot.phase = ScanPhase::Cancelled;
            snapshot.progress_text.clear();
            true
        });
        drop(active);
        if stopped {
            info!("Scan cancelled");
        }
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.state.subscribe()
    }

    pub fn is_scanning(&self) -> bool {
        self.state.borrow().is_scanning
    }

    /// Resolves once no sweep is running and returns the final snapshot.
    pub async fn wait(&self) -> ScanSnapshot {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(|snapshot| !snapshot.is_scanning).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_closed) => self.snapshot(),
        }
    }
}

impl Drop for ScanOrchestrator {
    fn drop(&mut self) {
        if let Some(cancel) = self.active.get_mut().take() {
            cancel.cancel();
        }
    }
}

fn sweep_range(range_input: &str) -> Result<(Ipv4Range, usize), SweepError> {
    let range: Ipv4Range = range_input.parse()?;
    let total: usize = usize::try_from(range.len()).map_err(|_| SweepError::invalid_range(range_input))?;
    Ok((range, total))
}

/// One sweep, owned by its driver task.
struct Sweep {
    scanner: Arc<ServiceScanner>,
    network: Arc<dyn Network>,
    range: Ipv4Range,
    total: usize,
    concurrency: usize,
    trigger_local_network: bool,
    cancel: CancelFlag,
    state: Arc<watch::Sender<ScanSnapshot>>,
}

impl Sweep {
    async fn run(self) {
        if self.trigger_local_network {
            self.network.trigger_local_network().await;
        }

        let total: usize = self.total;
        let next = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, ScanResult)>();

        let mut workers: JoinSet<()> = JoinSet::new();
        for _ in 0..self.concurrency.min(total) {
            workers.spawn(worker(
                self.scanner.clone(),
                self.range,
                next.clone(),
                self.cancel.clone(),
                tx.clone(),
            ));
        }
        drop(tx);

        let progress = ScanProgress::new(total);
        let mut buffer: ReorderBuffer<ScanResult> = ReorderBuffer::new(total);

        while let Some((index, result)) = rx.recv().await {
            let completed: usize = progress.increment();
            let released: Vec<ScanResult> = buffer.insert(index, result);

            let published: bool = self.state.send_if_modified(|snapshot| {
                if self.cancel.is_cancelled() {
                    return false;
                }
                snapshot.results.extend(released);
                snapshot.completed = completed;
                snapshot.progress_text = progress.text();
                true
            });
            if !published {
                break;
            }
        }

        if self.cancel.is_cancelled() {
            debug!("Sweep stopped after {} of {total} addresses", progress.completed());
            workers.abort_all();
            return;
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!("Scan worker failed: {e}");
            }
        }
        if !buffer.is_complete() {
            warn!("Sweep ended with {} of {total} addresses published", buffer.released());
        }

        let finished: bool = self.state.send_if_modified(|snapshot| {
            if self.cancel.is_cancelled() {
                return false;
            }
            snapshot.is_scanning = false;
            snapshot.phase = ScanPhase::Completed;
            snapshot.progress_text = progress::FINISHED_TEXT.to_string();
            true
        });
        if finished {
            info!("Scan complete: {} of {total} addresses published", buffer.released());
        }
    }
}

async fn worker(
    scanner: Arc<ServiceScanner>,
    range: Ipv4Range,
    next: Arc<AtomicUsize>,
    cancel: CancelFlag,
    results: mpsc::UnboundedSender<(usize, ScanResult)>,
) {
    loop {
        if cancel.is_cancelled() {
            return;
        }
        let index: usize = next.fetch_add(1, Ordering::Relaxed);
        let Some(address) = range.get(index as u64) else {
            return;
        };

        match scanner.scan_until_cancelled(address, &cancel).await {
            Some(result) => {
                if results.send((index, result)).is_err() {
                    return;
                }
            }
            None => return,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
