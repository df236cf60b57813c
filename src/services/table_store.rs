//! Named tabular storage
//!
//! Inventory and recipe tables are kept as whole CSV objects that are
//! downloaded, changed in memory and uploaded again.

use crate::output::{CsvTableSink, OutputResult, TableSink};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const UTF8_BOM: &str = "\u{feff}";

/// An in-memory table of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the named column
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let i = self.column_index(column)?;
        self.rows.get(row).map(|cells| cells[i].as_str())
    }

    /// Overwrites a cell; returns false when the row or column is missing
    pub fn set_cell(&mut self, row: usize, column: &str, value: impl Into<String>) -> bool {
        let Some(i) = self.column_index(column) else {
            return false;
        };
        match self.rows.get_mut(row) {
            Some(cells) => {
                cells[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Keeps only the rows `keep` accepts, in order
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Adds a row, padding or cutting it to the column count
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Appends `other` below this table
    ///
    /// Columns are matched by name. Columns only `other` has are added at
    /// the end and left blank in existing rows.
    pub fn append(&mut self, other: Table) {
        if self.columns.is_empty() {
            *self = other;
            return;
        }

        for column in &other.columns {
            if self.column_index(column).is_none() {
                self.columns.push(column.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }

        let positions: Vec<Option<usize>> =
            other.columns.iter().map(|c| self.column_index(c)).collect();

        for row in other.rows {
            let mut cells = vec![String::new(); self.columns.len()];
            for (value, position) in row.into_iter().zip(&positions) {
                if let Some(i) = position {
                    cells[*i] = value;
                }
            }
            self.rows.push(cells);
        }
    }
}

/// Whole-object table storage
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetches a table; a missing or empty object is an empty table
    async fn download(&self, name: &str) -> OutputResult<Table>;

    /// Replaces the stored object with `table`
    async fn upload(&self, table: &Table, name: &str) -> OutputResult<()>;
}

/// Appends `rows` to the stored table `name` and returns the new row count
pub async fn append_rows<S>(store: &S, name: &str, rows: Table) -> OutputResult<usize>
where
    S: TableStore + ?Sized,
{
    let mut table = store.download(name).await?;
    let added = rows.len();
    table.append(rows);
    store.upload(&table, name).await?;

    tracing::info!("Appended {} rows to {} ({} total)", added, name, table.len());
    Ok(table.len())
}

/// Stores tables as CSV files under a root directory
#[derive(Debug, Clone)]
pub struct LocalTableStore {
    root: PathBuf,
    sink: CsvTableSink,
}

impl LocalTableStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sink: CsvTableSink::default(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl TableStore for LocalTableStore {
    async fn download(&self, name: &str) -> OutputResult<Table> {
        let path = self.path_for(name);
        if !path.exists() {
            tracing::debug!("{} does not exist yet", path.display());
            return Ok(Table::default());
        }
        read_csv_table(&path)
    }

    async fn upload(&self, table: &Table, name: &str) -> OutputResult<()> {
        let columns: Vec<&str> = table.columns().iter().map(String::as_str).collect();
        self.sink.write_table(&columns, table.rows(), &self.path_for(name))
    }
}

fn read_csv_table(path: &Path) -> OutputResult<Table> {
    let content = std::fs::read_to_string(path)?;
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);
    if content.trim().is_empty() {
        return Ok(Table::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut table = Table::new(reader.headers()?.iter());
    for record in reader.records() {
        table.push_row(record?.iter().map(String::from).collect());
    }
    Ok(table)
}
