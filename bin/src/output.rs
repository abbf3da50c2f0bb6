//! Result output selection and writing.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tapeflow_lib::prelude::*;
use tracing::info;

/// Output selection shared by every command.
#[derive(Args, Debug, Clone)]
pub(crate) struct OutputArgs {
    /// Output format: csv, tsv, json or ndjson
    #[arg(short, long, default_value = "csv")]
    pub(crate) format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

/// Writes `records` to the selected file, or to stdout.
pub(crate) fn write<R>(args: &OutputArgs, records: &[R]) -> Result<()>
where
    R: Tabular + Serialize,
{
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            args.format.write_records(records, &mut writer)?;
            writer.flush()?;
            info!(
                records = records.len(),
                format = %args.format,
                path = %path.display(),
                "wrote output"
            );
        }
        None => {
            let mut writer = BufWriter::new(std::io::stdout());
            args.format.write_records(records, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tapeflow_lib::Ohlcv;

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.ndjson");
        let args = OutputArgs {
            format: OutputFormat::Ndjson,
            output: Some(path.clone()),
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let bars = [
            Ohlcv::new(at, 100.0, 101.0, 99.0, 100.5, 2.0, 3),
            Ohlcv::new(at, 100.5, 100.5, 100.5, 100.5, 1.0, 1),
        ];

        write(&args, &bars).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with('{'));
    }
}
