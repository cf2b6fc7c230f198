use std::sync::atomic::{AtomicUsize, Ordering};

/// Completion counter of one scan. Only ever incremented.
#[derive(Debug)]
pub struct ScanProgress {
    completed: AtomicUsize,
    total: usize,
}

impl ScanProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Records one finished address and returns the new count.
    pub fn increment(&self) -> usize {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// `Completed X/Y` for the current count.
    pub fn text(&self) -> String {
        format!("Completed {}/{}", self.completed(), self.total)
    }
}

pub fn queued_text(total: usize) -> String {
    format!("Queued 0/{total}")
}

pub const FINISHED_TEXT: &str = "IP Scan Complete";

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
