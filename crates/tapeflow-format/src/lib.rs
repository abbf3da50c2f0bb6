//! Output formatters for tapeflow aggregation results.
//!
//! Every result record implements [`Tabular`] and `Serialize`, so any
//! builder output can be written by any formatter:
//!
//! - [`CsvFormatter`] - CSV or TSV, nested levels flattened to one row each
//! - [`JsonFormatter`] - JSON array or NDJSON, records kept nested

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tapeflow/tapeflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod table;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use table::Tabular;
