use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::terminal::colors;

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

pub fn get_spinner() -> &'static ProgressBar {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> ProgressBar {
    let pb: ProgressBar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(TICKS));
    }
    pb
}

pub fn start(message: &str) {
    let pb = get_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(TICK_INTERVAL);
}

pub fn report_scan_progress(progress_text: &str, alive: usize) {
    get_spinner().set_message(
        format!(
            "{progress_text}, {} so far... {}",
            format!("{alive} alive").green().bold(),
            "(Ctrl-C to stop)".italic().dimmed()
        )
        .color(colors::TEXT_DEFAULT)
        .to_string(),
    );
}

pub fn finish() {
    get_spinner().finish_and_clear();
}

/// Log sink that hides the spinner while a line is written.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        get_spinner().suspend(|| io::stdout().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
