//! Registry Store
//!
//! Reads registry items out of the backing sheet and records claims.
//!
//! Sheet layout (row 1 is the header):
//! ```text
//! A product name | B manufacturer | C price | D product URL | E image URL
//! F claimed flag | G claimed by   | H claimed at (written, never read back)
//! ```

mod claim;
mod item;

pub use claim::{is_claimed, ClaimOutcome, ALREADY_CLAIMED_MESSAGE, CLAIMED_MESSAGE};
pub use item::{Column, RegistryItem};

use crate::error::{GatewayError, Result};
use crate::sheet::{CellValue, CellWrite, Sheet, Workbook};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

const FIRST_DATA_ROW: usize = 2;

pub struct RegistryStore {
    workbook: Arc<dyn Workbook>,
    sheet_name: String,
}

impl RegistryStore {
    pub fn new(workbook: Arc<dyn Workbook>, sheet_name: &str) -> Self {
        Self {
            workbook,
            sheet_name: sheet_name.to_string(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Whether the registry sheet can currently be opened.
    pub fn is_available(&self) -> bool {
        matches!(self.workbook.sheet(&self.sheet_name), Ok(Some(_)))
    }

    fn open_sheet(&self) -> Result<Sheet> {
        self.workbook
            .sheet(&self.sheet_name)?
            .ok_or_else(|| GatewayError::SheetNotFound {
                sheet: self.sheet_name.clone(),
            })
    }

    /// All non-empty data rows, in sheet order.
    pub fn list_items(&self) -> Result<Vec<RegistryItem>> {
        let sheet = self.open_sheet()?;
        let last_row = sheet.last_row();

        if last_row < FIRST_DATA_ROW {
            return Ok(Vec::new());
        }

        let items: Vec<RegistryItem> = (FIRST_DATA_ROW..=last_row)
            .filter_map(|row| RegistryItem::from_row(&sheet, row))
            .collect();

        debug!(
            "Listed {} items from sheet '{}' ({} rows)",
            items.len(),
            self.sheet_name,
            last_row
        );

        Ok(items)
    }

    /// Claim the item at `row_index`, stamped with the current time.
    pub fn claim_item(&self, row_index: i64, claimed_by: Option<&str>) -> Result<ClaimOutcome> {
        self.claim_item_at(row_index, claimed_by, Utc::now())
    }

    /// Claim the item at `row_index`, stamped with `claimed_at`.
    ///
    /// The claimant cell is only written when `claimed_by` holds
    /// non-whitespace text.
    pub fn claim_item_at(
        &self,
        row_index: i64,
        claimed_by: Option<&str>,
        claimed_at: DateTime<Utc>,
    ) -> Result<ClaimOutcome> {
        let sheet = self.open_sheet()?;
        let last_row = sheet.last_row();

        let row = usize::try_from(row_index)
            .ok()
            .filter(|row| (FIRST_DATA_ROW..=last_row).contains(row))
            .ok_or(GatewayError::InvalidRowIndex {
                row_index,
                last_row,
            })?;

        if is_claimed(sheet.cell(row, Column::Claimed.number())) {
            info!("Row {} in '{}' is already claimed", row, self.sheet_name);
            return Ok(ClaimOutcome::already_claimed());
        }

        let mut writes = vec![CellWrite::new(row, Column::Claimed.number(), true)];

        let claimant = claimed_by.filter(|name| !name.trim().is_empty());
        if let Some(name) = claimant {
            writes.push(CellWrite::new(row, Column::ClaimedBy.number(), name));
        }

        writes.push(CellWrite::new(
            row,
            Column::ClaimedAt.number(),
            CellValue::text(claimed_at.to_rfc3339()),
        ));

        self.workbook.write_cells(&self.sheet_name, &writes)?;

        info!(
            "Claimed row {} in '{}' by {:?}",
            row, self.sheet_name, claimant
        );

        Ok(ClaimOutcome::claimed())
    }
}
