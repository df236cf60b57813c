//! Output handler traits and types
//!
//! This module defines the tabular sink interface and the report produced
//! at the end of a harvest run.

use crate::crawler::{HarvestStop, PaginationStop};
use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a whole table at once
pub trait TableSink: Send + Sync {
    /// Writes `rows` under a header of `columns`, replacing `path`
    ///
    /// Every row must have exactly `columns.len()` cells.
    fn write_table(&self, columns: &[&str], rows: &[Vec<String>], path: &Path) -> OutputResult<()>;
}

/// Summary of one completed harvest run
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub listing_url: String,
    pub config_hash: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    pub pages_visited: u32,
    pub pagination_stop: PaginationStop,
    pub harvest_stop: HarvestStop,

    pub links_collected: usize,
    pub links_processed: usize,
    pub success_count: usize,
    pub skip_count: usize,
    pub transport_skips: usize,
    pub incomplete_skips: usize,

    pub dataset_path: String,
}

impl HarvestReport {
    /// Run time in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of processed links that produced a record
    pub fn success_rate(&self) -> f64 {
        if self.links_processed == 0 {
            return 0.0;
        }
        (self.success_count as f64 / self.links_processed as f64) * 100.0
    }
}
