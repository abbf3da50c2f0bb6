//! Tick file discovery and CSV ingestion.
//!
//! Files hold one trade per row with the columns `timestamp` (milliseconds
//! since epoch), `price`, `volume` and `side`. The symbol is taken from the
//! file name prefix before the first `_`, e.g. `BTCUSDT_2024-05-01.csv`.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use std::path::{Path, PathBuf};
use tapeflow_lib::prelude::*;
use tracing::{debug, info, warn};

/// Input selection shared by every command.
#[derive(Args, Debug, Clone)]
pub(crate) struct InputArgs {
    /// Tick CSV files or directories containing them
    #[arg(required = true, value_name = "INPUT")]
    pub(crate) paths: Vec<PathBuf>,

    /// Symbol to stamp on every tick (default: file name prefix)
    #[arg(long)]
    pub(crate) symbol: Option<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) end: Option<NaiveDate>,

    /// Sort ticks by timestamp before aggregating
    #[arg(long)]
    pub(crate) sort: bool,

    /// Log and skip malformed rows instead of failing
    #[arg(long)]
    pub(crate) skip_invalid: bool,
}

impl InputArgs {
    fn date_range(&self) -> Result<DateRange> {
        DateRange::bounded(self.start, self.end).context("Invalid --start/--end")
    }
}

/// Reads every selected file and returns the ticks in file order.
pub(crate) fn load_ticks(args: &InputArgs) -> Result<Vec<Tick>> {
    let range = args.date_range()?;
    let files = collect_files(&args.paths)?;

    let mut ticks = Vec::new();
    let mut selected = 0usize;
    for file in files.iter().filter(|f| file_in_range(f, &range)) {
        let symbol = args
            .symbol
            .clone()
            .unwrap_or_else(|| symbol_from_path(file));
        let before = ticks.len();
        read_file(file, &symbol, args.skip_invalid, &mut ticks)?;
        debug!(file = %file.display(), %symbol, ticks = ticks.len() - before, "read file");
        selected += 1;
    }

    if selected == 0 {
        bail!("No input files matched {range}");
    }

    let total = ticks.len();
    ticks.retain(|t| range.contains_timestamp(t.timestamp));
    if ticks.len() < total {
        debug!(dropped = total - ticks.len(), "ticks outside date range");
    }

    if args.sort {
        ticks.sort_by_key(|t| t.timestamp);
    }

    info!(files = selected, ticks = ticks.len(), "loaded ticks");
    Ok(ticks)
}

/// Expands directories to their `*.csv` entries, sorted by file name.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?;
            for entry in entries {
                let entry = entry?.path();
                if entry.is_file() && entry.extension().is_some_and(|e| e == "csv") {
                    files.push(entry);
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("Input not found: {}", path.display());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Files without a date in their name are always read.
fn file_in_range(path: &Path, range: &DateRange) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    date_from_name(name).is_none_or(|date| range.contains(date))
}

/// Finds the first `YYYY-MM-DD` or `YYYY_MM_DD` date in a file name.
fn date_from_name(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    (0..bytes.len().saturating_sub(9)).find_map(|i| {
        let window = &bytes[i..i + 10];
        let separated = matches!(window[4], b'-' | b'_') && window[7] == window[4];
        let digits = [0..4, 5..7, 8..10]
            .into_iter()
            .all(|r| window[r].iter().all(u8::is_ascii_digit));
        if !(separated && digits) {
            return None;
        }
        let text = std::str::from_utf8(window).ok()?.replace('_', "-");
        NaiveDate::parse_from_str(&text, "%Y-%m-%d").ok()
    })
}

/// Returns the file name prefix before the first `_`.
fn symbol_from_path(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    stem.split('_').next().unwrap_or(stem).to_string()
}

fn read_file(path: &Path, symbol: &str, skip_invalid: bool, out: &mut Vec<Tick>) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    for (row, record) in reader.deserialize::<RawTick>().enumerate() {
        // Header is line 1.
        let line = row + 2;
        let parsed = record
            .map_err(anyhow::Error::from)
            .and_then(|raw| raw.into_tick(symbol).map_err(anyhow::Error::from));
        match parsed {
            Ok(tick) => out.push(tick),
            Err(err) if skip_invalid => {
                warn!(file = %path.display(), line, error = %err, "skipping invalid row");
            }
            Err(err) => {
                return Err(err.context(format!("{}:{line}", path.display())));
            }
        }
    }
    Ok(())
}
