//! JSON workbook file
//!
//! Layout on disk:
//! ```json
//! { "sheets": { "Registry": [["Product Name", "Manufacturer", ...], ...] } }
//! ```
//!
//! Every read loads the file fresh so edits made to it out-of-band are
//! picked up by the next request. Writes replace the file atomically.

use super::{CellWrite, Sheet, Workbook};
use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct WorkbookDocument {
    #[serde(default)]
    sheets: BTreeMap<String, Sheet>,
}

pub struct FileWorkbook {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileWorkbook {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<WorkbookDocument> {
        if !self.path.exists() {
            return Ok(WorkbookDocument::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            GatewayError::Internal(format!(
                "Failed to read workbook {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            GatewayError::Internal(format!(
                "Failed to parse workbook {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, document: &WorkbookDocument) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&dir).map_err(|e| {
            GatewayError::Internal(format!(
                "Failed to create workbook directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let content = serde_json::to_vec_pretty(document).map_err(|e| {
            GatewayError::Internal(format!("Failed to serialize workbook: {}", e))
        })?;

        let mut temp_file = NamedTempFile::new_in(&dir)?;
        temp_file.write_all(&content)?;
        temp_file.flush()?;

        temp_file.persist(&self.path).map_err(|e| {
            GatewayError::Internal(format!(
                "Failed to replace workbook {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

impl Workbook for FileWorkbook {
    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.load()?.sheets.into_keys().collect())
    }

    fn sheet(&self, name: &str) -> Result<Option<Sheet>> {
        Ok(self.load()?.sheets.remove(name))
    }

    fn write_cells(&self, name: &str, writes: &[CellWrite]) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| GatewayError::Internal("Workbook lock poisoned".to_string()))?;

        let mut document = self.load()?;
        let sheet = document
            .sheets
            .get_mut(name)
            .ok_or_else(|| GatewayError::SheetNotFound {
                sheet: name.to_string(),
            })?;

        sheet.apply(writes);
        self.save(&document)?;

        debug!(
            "Wrote {} cells to sheet '{}' in {}",
            writes.len(),
            name,
            self.path.display()
        );

        Ok(())
    }
}
