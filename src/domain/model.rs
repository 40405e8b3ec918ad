use crate::utils::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One character (item) owned by one alliance member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedItemRecord {
    pub item_id: String,
    pub owner_id: String,
    pub power: u64,
}

impl OwnedItemRecord {
    pub fn new(item_id: impl Into<String>, owner_id: impl Into<String>, power: u64) -> Self {
        Self {
            item_id: item_id.into(),
            owner_id: owner_id.into(),
            power,
        }
    }
}

/// A table cell. Serializes untagged so a Sheets `values` payload carries
/// plain JSON strings and numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(u64),
    Text(String),
}

impl Cell {
    /// Integer reading of the cell; text cells count when they parse.
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Cell::Int(value) => Some(*value),
            Cell::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{}", value),
            Cell::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Int(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Rectangular report table: a header and one row per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Row count including the header row.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Row-major values with the header first, as a sheet expects them.
    pub fn values(&self) -> Vec<Vec<Cell>> {
        let mut values = Vec::with_capacity(self.row_count());
        values.push(self.header.iter().map(|h| Cell::Text(h.clone())).collect());
        values.extend(self.rows.iter().cloned());
        values
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| ReportError::ProcessingError {
            message: e.to_string(),
        })
    }
}

/// The unit handed to a publisher: one ranked table plus where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    pub range: String,
    pub table: Table,
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub published: Vec<String>,
    pub failed: Vec<(String, String)>,
    /// Where the reports ended up (zip path, output directory or spreadsheet id).
    pub location: Option<String>,
}
