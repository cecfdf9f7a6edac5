//! Sheet backend
//!
//! The backing table is reached only through the [`Workbook`] trait so the
//! registry store can run against a file on disk or an in-memory double.
//!
//! Rows and columns are 1-based everywhere, the way a person editing the
//! sheet counts them. Row 1 is the header.

mod cell;
mod file;
mod memory;

pub use cell::CellValue;
pub use file::FileWorkbook;
pub use memory::MemoryWorkbook;

use crate::error::Result;
use serde::{Deserialize, Serialize};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Snapshot of one sheet's values. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Cells of a 1-based row, `None` past the stored range.
    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        row.checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .map(|r| r.as_slice())
    }

    /// Value at a 1-based (row, column). Missing cells read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.row(row)
            .and_then(|cells| column.checked_sub(1).and_then(|idx| cells.get(idx)))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 1-based number of the last occupied row, 0 if none. Whitespace-only
    /// cells count as occupied.
    pub fn last_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|cells| cells.iter().any(|c| !c.is_empty()))
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    /// Set a 1-based cell, padding rows and columns with empty cells.
    pub fn set(&mut self, row: usize, column: usize, value: CellValue) {
        if row == 0 || column == 0 {
            return;
        }

        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }

        let cells = &mut self.rows[row - 1];
        if cells.len() < column {
            cells.resize(column, CellValue::Empty);
        }

        cells[column - 1] = value;
    }

    pub fn apply(&mut self, writes: &[CellWrite]) {
        for write in writes {
            self.set(write.row, write.column, write.value.clone());
        }
    }
}

/// One pending cell update.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub row: usize,
    pub column: usize,
    pub value: CellValue,
}

impl CellWrite {
    pub fn new(row: usize, column: usize, value: impl Into<CellValue>) -> Self {
        Self {
            row,
            column,
            value: value.into(),
        }
    }
}

/// Handle to the external tabular datastore.
///
/// Each call is atomic on its own. Nothing ties a `sheet` read to a later
/// `write_cells`; callers that read then write get best-effort exclusivity.
pub trait Workbook: Send + Sync {
    /// Names of all sheets in the workbook, sorted.
    fn sheet_names(&self) -> Result<Vec<String>>;

    /// Snapshot of a sheet, `None` when no sheet has that name.
    fn sheet(&self, name: &str) -> Result<Option<Sheet>>;

    /// Apply a batch of cell writes to an existing sheet in one step.
    fn write_cells(&self, name: &str, writes: &[CellWrite]) -> Result<()>;
}
