//! # CSV Export
//!
//! Renders scan results as CSV text. Fields containing a comma, a double quote
//! or a line break are wrapped in double quotes with inner quotes doubled.

use csv::{QuoteStyle, ReaderBuilder, Terminator, Writer, WriterBuilder};

use crate::error::SweepError;
use crate::network::result::ScanResult;

const HEADER_WITH_MAC: [&str; 5] = ["IP", "Hostname", "MAC", "Alive", "Services"];
const HEADER_WITHOUT_MAC: [&str; 3] = ["Hostname", "Alive", "Services"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvLayout {
    /// `IP,Hostname,MAC,Alive,Services`
    #[default]
    Full,
    /// `Hostname,Alive,Services`, for consumers that do not track MAC addresses.
    WithoutMac,
}

/// One header line followed by one line per result, joined by `\n`.
pub fn csv_string(results: &[ScanResult], layout: CsvLayout) -> Result<String, SweepError> {
    let header: &[&str] = match layout {
        CsvLayout::Full => &HEADER_WITH_MAC,
        CsvLayout::WithoutMac => &HEADER_WITHOUT_MAC,
    };

    let mut writer: Writer<Vec<u8>> = writer();
    writer.write_record(header).map_err(export_error)?;

    for result in results {
        writer.write_record(row(result, layout)).map_err(export_error)?;
    }
    finish(writer)
}

fn row(result: &ScanResult, layout: CsvLayout) -> Vec<String> {
    let hostname: String = result.hostname.clone().unwrap_or_default();
    let alive: String = if result.is_alive { "yes" } else { "no" }.to_string();
    let services: String = result
        .open_services
        .iter()
        .map(|service| service.name.as_str())
        .collect::<Vec<&str>>()
        .join(";");

    match layout {
        CsvLayout::Full => vec![
            result.address.to_string(),
            hostname,
            result.mac_address.clone().unwrap_or_default(),
            alive,
            services,
        ],
        CsvLayout::WithoutMac => vec![hostname, alive, services],
    }
}

pub fn escape_field(field: &str) -> Result<String, SweepError> {
    // A lone empty field would otherwise be written as `""`.
    if field.is_empty() {
        return Ok(String::new());
    }
    let mut writer: Writer<Vec<u8>> = writer();
    writer.write_record([field]).map_err(export_error)?;
    finish(writer)
}

/// Inverse of [`escape_field`].
pub fn unescape_field(field: &str) -> Result<String, SweepError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(field.as_bytes());

    match reader.records().next() {
        Some(record) => {
            let record = record.map_err(export_error)?;
            Ok(record.get(0).unwrap_or_default().to_string())
        }
        None => Ok(String::new()),
    }
}

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new())
}

/// Drains `writer` and drops the terminator after the last record.
fn finish(writer: Writer<Vec<u8>>) -> Result<String, SweepError> {
    let bytes: Vec<u8> = writer
        .into_inner()
        .map_err(|e| SweepError::CsvExport(e.to_string()))?;
    let mut text: String = String::from_utf8(bytes).map_err(|e| SweepError::CsvExport(e.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn export_error(e: csv::Error) -> SweepError {
    SweepError::CsvExport(e.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
