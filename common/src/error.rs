use thiserror::Error;

/// Failures that are reported to the operator.
///
/// Everything that happens while probing a single address is folded into the
/// result model instead and never shows up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SweepError {
    #[error("Invalid range. Use format 192.168.1.1-192.168.1.15")]
    InvalidRange { input: String },

    #[error("Service configuration could not be decoded: {0}")]
    ServiceConfigDecode(String),

    #[error("Import failed: {0}")]
    ImportDecode(String),

    #[error("Invalid service '{name}:{port}'")]
    InvalidService { name: String, port: i64 },

    #[error("CSV export failed: {0}")]
    CsvExport(String),
}

impl SweepError {
    pub fn invalid_range(input: &str) -> Self {
        Self::InvalidRange {
            input: input.to_string(),
        }
    }
}
