//! Output module for datasets and run summaries
//!
//! This module handles:
//! - Writing the harvested dataset as CSV
//! - Generating markdown summaries of harvest runs
//! - Printing run statistics

mod csv_output;
mod markdown;
pub mod stats;
mod traits;

pub use csv_output::{write_csv, write_dataset, CsvTableSink};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::print_report;
pub use traits::{HarvestReport, OutputError, OutputResult, TableSink};
