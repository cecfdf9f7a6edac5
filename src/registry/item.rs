use crate::sheet::Sheet;
use serde::Serialize;

/// Columns of the registry sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ProductName,
    Manufacturer,
    Price,
    ProductUrl,
    ImageUrl,
    Claimed,
    ClaimedBy,
    ClaimedAt,
}

impl Column {
    /// 1-based sheet column (A = 1).
    pub const fn number(self) -> usize {
        match self {
            Column::ProductName => 1,
            Column::Manufacturer => 2,
            Column::Price => 3,
            Column::ProductUrl => 4,
            Column::ImageUrl => 5,
            Column::Claimed => 6,
            Column::ClaimedBy => 7,
            Column::ClaimedAt => 8,
        }
    }
}

/// A registry item as published to visitors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    /// Sheet row number, header being row 1.
    pub id: usize,
    pub product_name: String,
    pub manufacturer: String,
    pub price: String,
    pub product_url: String,
    pub image_url: String,
    pub claimed: bool,
    pub claimed_by: String,
}

impl RegistryItem {
    /// Project a sheet row into an item. Rows with a blank product name
    /// are not items and yield `None`.
    pub fn from_row(sheet: &Sheet, row: usize) -> Option<Self> {
        let product_name = sheet.cell(row, Column::ProductName.number());
        if product_name.is_blank() {
            return None;
        }

        let text = |column: Column| sheet.cell(row, column.number()).as_text();

        Some(Self {
            id: row,
            product_name: product_name.as_text(),
            manufacturer: text(Column::Manufacturer),
            price: text(Column::Price),
            product_url: text(Column::ProductUrl),
            image_url: text(Column::ImageUrl),
            claimed: super::is_claimed(sheet.cell(row, Column::Claimed.number())),
            claimed_by: text(Column::ClaimedBy),
        })
    }
}
