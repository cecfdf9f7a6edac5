use super::{CellWrite, Sheet, Workbook};
use crate::error::{GatewayError, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Workbook held entirely in process memory.
///
/// Used when no workbook file is configured and as the test double for
/// the registry store.
#[derive(Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Mutex<BTreeMap<String, Sheet>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(self, name: &str, sheet: Sheet) -> Self {
        if let Ok(mut sheets) = self.sheets.lock() {
            sheets.insert(name.to_string(), sheet);
        }
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Sheet>>> {
        self.sheets
            .lock()
            .map_err(|_| GatewayError::Internal("Workbook lock poisoned".to_string()))
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn sheet(&self, name: &str) -> Result<Option<Sheet>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn write_cells(&self, name: &str, writes: &[CellWrite]) -> Result<()> {
        let mut sheets = self.lock()?;
        let sheet = sheets.get_mut(name).ok_or_else(|| GatewayError::SheetNotFound {
            sheet: name.to_string(),
        })?;

        sheet.apply(writes);
        Ok(())
    }
}
