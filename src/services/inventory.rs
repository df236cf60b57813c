//! The ingredient inventory table
//!
//! Rows follow [`INVENTORY_COLUMNS`]. Items enter through
//! [`InventoryItem::from_detected`] and leave through [`consume`].

use crate::services::{DetectedIngredient, Quantity, Table};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Days left below which an item is at risk
pub const AT_RISK_DAYS: i64 = 4;

/// Errors applying usages to an inventory table
#[derive(Debug, Error, PartialEq)]
pub enum InventoryError {
    #[error("Inventory table has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("No inventory row {0}")]
    UnknownRow(usize),

    #[error("Row {row} has a non-numeric quantity '{value}'")]
    InvalidQuantity { row: usize, value: String },

    #[error("Used amount must be a positive number, got {0}")]
    InvalidAmount(f64),
}

/// How close an item is to its expiration date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// Past the expiration date
    Discard,
    /// Fewer than [`AT_RISK_DAYS`] days left
    AtRisk,
    Fresh,
    /// The stored date could not be read
    Unknown,
}

impl ExpiryStatus {
    pub fn from_days_left(days_left: i64) -> Self {
        if days_left < 0 {
            Self::Discard
        } else if days_left < AT_RISK_DAYS {
            Self::AtRisk
        } else {
            Self::Fresh
        }
    }

    /// Status of a stored `YYYY-MM-DD` expiration date
    pub fn of_stored_date(expiration_date: &str, today: NaiveDate) -> Self {
        match NaiveDate::parse_from_str(expiration_date.trim(), "%Y-%m-%d") {
            Ok(date) => Self::from_days_left((date - today).num_days()),
            Err(_) => Self::Unknown,
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Discard => "discard",
            Self::AtRisk => "at risk",
            Self::Fresh => "fresh",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Columns of the stored ingredient inventory
pub const INVENTORY_COLUMNS: [&str; 6] = [
    "name",
    "quantity",
    "unit",
    "expiry_days",
    "expiration_date",
    "date_added",
];

/// An ingredient registered in the inventory
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub expiry_days: i64,
    pub expiration_date: NaiveDate,
    pub date_added: NaiveDateTime,
}

impl InventoryItem {
    /// Registers a detected ingredient at `registered_at`
    ///
    /// Returns `None` when the model gave no storage period, a negative one,
    /// or one that puts the expiration date outside the calendar range.
    pub fn from_detected(detected: &DetectedIngredient, registered_at: NaiveDateTime) -> Option<Self> {
        let expiry_days = detected.expiry_days.filter(|days| *days >= 0)?;
        let expiration_date = registered_at
            .date()
            .checked_add_signed(TimeDelta::try_days(expiry_days)?)?;
        Some(Self {
            name: detected.name.trim().to_string(),
            quantity: detected
                .quantity
                .as_ref()
                .map(Quantity::to_string)
                .unwrap_or_default(),
            unit: detected.unit.clone(),
            expiry_days,
            expiration_date,
            date_added: registered_at,
        })
    }

    /// Freshness on `today`
    pub fn status(&self, today: NaiveDate) -> ExpiryStatus {
        ExpiryStatus::from_days_left((self.expiration_date - today).num_days())
    }

    /// Cells in [`INVENTORY_COLUMNS`] order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.quantity.clone(),
            self.unit.clone(),
            self.expiry_days.to_string(),
            self.expiration_date.format("%Y-%m-%d").to_string(),
            self.date_added.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}

/// An amount used from one inventory row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    /// Row index in the table as downloaded
    pub row: usize,
    pub amount: f64,
}

/// Deducts `usages` from the inventory and drops what is used up
///
/// Every usage is checked before any quantity changes, so an error leaves
/// the table untouched. Usages of the same row add up. Afterwards every row whose quantity is zero or
/// less is removed; rows whose quantity is not a number are kept as they
/// are. Returns the names of the removed rows.
pub fn consume(table: &mut Table, usages: &[Usage]) -> Result<Vec<String>, InventoryError> {
    let quantity_col = table
        .column_index("quantity")
        .ok_or(InventoryError::MissingColumn("quantity"))?;
    let name_col = table.column_index("name");

    let mut remaining: BTreeMap<usize, f64> = BTreeMap::new();
    for usage in usages {
        if !(usage.amount.is_finite() && usage.amount > 0.0) {
            return Err(InventoryError::InvalidAmount(usage.amount));
        }
        let cells = table
            .rows()
            .get(usage.row)
            .ok_or(InventoryError::UnknownRow(usage.row))?;
        let value = &cells[quantity_col];
        let held = parse_quantity(value).ok_or_else(|| InventoryError::InvalidQuantity {
            row: usage.row,
            value: value.clone(),
        })?;
        *remaining.entry(usage.row).or_insert(held) -= usage.amount;
    }

    for (row, left) in remaining {
        let left = if left <= 0.0 { 0.0 } else { left };
        table.set_cell(row, "quantity", left.to_string());
    }

    let mut removed = Vec::new();
    table.retain_rows(|cells| {
        let used_up = parse_quantity(&cells[quantity_col]).is_some_and(|q| q <= 0.0);
        if used_up {
            removed.push(name_col.map(|i| cells[i].clone()).unwrap_or_default());
        }
        !used_up
    });

    if !removed.is_empty() {
        tracing::info!("Used up and removed: {}", removed.join(", "));
    }
    Ok(removed)
}

fn parse_quantity(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|q| q.is_finite())
}
