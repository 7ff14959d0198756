//! Output types: the structured schedule and its extraction statistics.
//!
//! A [`ScheduleRow`] is one row of the final spreadsheet. The field layout
//! mirrors the seven output columns exactly (see
//! [`crate::pipeline::xlsx::COLUMN_HEADERS`]), so serialising a row, to
//! XLSX or to JSON via `--json`, is a straight field-by-field mapping with
//! no reordering logic anywhere downstream.

use serde::{Deserialize, Serialize};

/// One emitted record of the structured schedule.
///
/// Two shapes occur:
///
/// * a standalone task: `subtask_number` and `subtask_name` are empty, the
///   dates are the task's own;
/// * a subtask: `task_name` names the owning parent, `subtask_number` is
///   `"N.M"`, and the dates belong to the subtask row.
///
/// `ot_number` (work-order number) is part of the external spreadsheet
/// contract but is never filled by extraction; downstream consumers assign
/// work orders by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Work-order number column. Always empty in extracted output.
    pub ot_number: String,
    /// Synthesised top-level task number (1-based).
    pub task_number: u32,
    /// Description of the owning task.
    pub task_name: String,
    /// `"N.M"` for subtasks, empty for standalone tasks.
    pub subtask_number: String,
    /// Description of the subtask, empty for standalone tasks.
    pub subtask_name: String,
    /// Start date as extracted; no format validation is applied.
    pub start_date: String,
    /// End date as extracted; no format validation is applied.
    pub end_date: String,
}

/// Result of a successful extraction: the ordered schedule rows plus
/// run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Structured records in document order.
    pub rows: Vec<ScheduleRow>,
    /// Statistics about the extraction run.
    pub stats: ExtractionStats,
}

/// Statistics about a single extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of PDF pages scanned for text.
    pub pages_scanned: usize,
    /// Raw grid rows reconstructed across all scanned pages.
    pub grid_rows: usize,
    /// Rows in the data region below the header marker.
    pub data_rows: usize,
    /// Distinct top-level task numbers in the output.
    pub tasks: usize,
    /// Records carrying an `"N.M"` subtask number.
    pub subtasks: usize,
    /// Total wall-clock duration in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent inside pdfium text extraction in milliseconds.
    pub extract_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_row_json_round_trip() {
        let row = ScheduleRow {
            ot_number: String::new(),
            task_number: 2,
            task_name: "Concrete".into(),
            subtask_number: "2.1".into(),
            subtask_name: "Pour footing".into(),
            start_date: "2024-01-11".into(),
            end_date: "2024-01-12".into(),
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: ScheduleRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }
}
