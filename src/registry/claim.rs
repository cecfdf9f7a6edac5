use crate::sheet::CellValue;
use serde::Serialize;

const CLAIMED_MARKERS: [&str; 4] = ["true", "yes", "claimed", "x"];

pub const CLAIMED_MESSAGE: &str = "Item claimed successfully";
pub const ALREADY_CLAIMED_MESSAGE: &str = "Item already claimed";

/// Whether a raw claimed-flag cell counts as claimed.
pub fn is_claimed(value: &CellValue) -> bool {
    let normalized = value.as_text().trim().to_lowercase();
    CLAIMED_MARKERS.contains(&normalized.as_str())
}

/// Result of a claim attempt that reached the sheet.
///
/// A rejected claim is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimOutcome {
    pub success: bool,
    pub message: String,
}

impl ClaimOutcome {
    pub fn claimed() -> Self {
        Self {
            success: true,
            message: CLAIMED_MESSAGE.to_string(),
        }
    }

    pub fn already_claimed() -> Self {
        Self {
            success: false,
            message: ALREADY_CLAIMED_MESSAGE.to_string(),
        }
    }
}
