//! Output format abstraction.

use serde::Serialize;
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter, Tabular};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Comma-separated values, one row per record or nested level.
    #[default]
    Csv,
    /// Tab-separated values.
    Tsv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Tsv, Self::Json, Self::Ndjson]
    }

    /// Writes `records` to `writer` in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_records<R, W>(&self, records: &[R], writer: W) -> Result<(), FormatError>
    where
        R: Tabular + Serialize,
        W: Write + Send,
    {
        match self {
            Self::Csv => CsvFormatter::new().write_records(records, writer),
            Self::Tsv => CsvFormatter::tsv().write_records(records, writer),
            Self::Json => JsonFormatter::new().write_records(records, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_records(records, writer),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes result records to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_records<R, W>(&self, records: &[R], writer: W) -> Result<(), FormatError>
    where
        R: Tabular + Serialize,
        W: Write + Send;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}
