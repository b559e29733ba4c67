//! Spreadsheet import report.

use serde::{Deserialize, Serialize};

/// One failed row of a spreadsheet import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    /// 1-based sheet row. The first data row is 2; 0 marks a failure of the
    /// workbook as a whole.
    pub row_number: u32,
    /// Name cell text of the failed row, empty when absent or unreadable.
    pub contact_name: String,
    pub error_message: String,
}

/// Outcome counters and per-row errors of one import call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Data rows present in the sheet (header excluded).
    pub total_count: u32,
    /// Rows folded into a contact.
    pub success_count: u32,
    pub errors: Vec<ImportError>,
}

impl ImportReport {
    /// Report for an import that stopped before reading any row.
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            total_count: 0,
            success_count: 0,
            errors: vec![ImportError {
                row_number: 0,
                contact_name: String::new(),
                error_message: message.into(),
            }],
        }
    }

    /// Rows that did not make it into a contact.
    pub fn error_count(&self) -> u32 {
        self.total_count.saturating_sub(self.success_count)
    }

    /// True when no data row failed. A workbook-level problem reads 0 rows
    /// and so counts as success; see [`Self::is_structural_failure`].
    pub fn is_success(&self) -> bool {
        self.error_count() == 0
    }

    /// True when the import stopped on a workbook-level problem.
    pub fn is_structural_failure(&self) -> bool {
        self.errors.iter().any(|e| e.row_number == 0)
    }
}
