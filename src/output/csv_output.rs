//! CSV dataset output

use crate::output::traits::{OutputError, OutputResult, TableSink};
use crate::state::{RecipeRecord, RECORD_COLUMNS};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes tables as comma-separated text with a header row
#[derive(Debug, Clone, Copy)]
pub struct CsvTableSink {
    write_bom: bool,
}

impl CsvTableSink {
    pub fn new(write_bom: bool) -> Self {
        Self { write_bom }
    }
}

impl Default for CsvTableSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TableSink for CsvTableSink {
    fn write_table(&self, columns: &[&str], rows: &[Vec<String>], path: &Path) -> OutputResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(File::create(path)?);
        if self.write_bom {
            file.write_all(UTF8_BOM)?;
        }

        write_csv(&mut file, columns, rows)?;
        file.flush()?;
        Ok(())
    }
}

/// Writes a header and rows as CSV to any writer
pub fn write_csv<W: Write>(writer: W, columns: &[&str], rows: &[Vec<String>]) -> OutputResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns)?;

    for (i, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(OutputError::Format(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }
        csv_writer.write_record(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes harvested records as the `title,url,ingredients,steps` dataset
pub fn write_dataset(sink: &dyn TableSink, records: &[RecipeRecord], path: &Path) -> OutputResult<()> {
    let rows: Vec<Vec<String>> = records.iter().map(RecipeRecord::to_row).collect();
    sink.write_table(&RECORD_COLUMNS, &rows, path)
}
