//! CSV output format.

use serde::Serialize;
use std::io::Write;

use crate::{FormatError, Formatter, Tabular};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_records<R, W>(&self, records: &[R], writer: W) -> Result<(), FormatError>
    where
        R: Tabular + Serialize,
        W: Write + Send,
    {
        let mut out = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(writer);

        if self.include_header {
            out.write_record(R::header())?;
        }
        for record in records {
            for row in record.rows() {
                out.write_record(&row)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == b'\t' { "tsv" } else { "csv" }
    }
}
