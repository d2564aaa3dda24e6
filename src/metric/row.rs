//! Turning one result row into a field set.

use std::collections::BTreeMap;

use thiserror::Error;

use super::value::{FieldValue, coerce};

/// Field values of one row, keyed by column name.
pub type FieldSet = BTreeMap<String, FieldValue>;

/// One cell as read from the driver.
///
/// Each cell owns its bytes; nothing is shared between rows. SQL NULL is
/// an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell(Vec<u8>);

impl RawCell {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn null() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RowError {
    #[error("Row has {cells} cells but the result set has {columns} columns")]
    ColumnCountMismatch { columns: usize, cells: usize },
}

/// Build the field set for one row.
///
/// Cells that coerce to nothing are left out. A row whose width differs
/// from the column list is rejected instead of being zipped short.
pub fn materialize(columns: &[String], cells: &[RawCell]) -> Result<FieldSet, RowError> {
    if columns.len() != cells.len() {
        return Err(RowError::ColumnCountMismatch {
            columns: columns.len(),
            cells: cells.len(),
        });
    }

    let mut fields = FieldSet::new();
    for (column, cell) in columns.iter().zip(cells) {
        if let Some(value) = coerce(cell.as_bytes()) {
            fields.insert(column.clone(), value);
        }
    }
    Ok(fields)
}
