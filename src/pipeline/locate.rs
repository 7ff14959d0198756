//! Table location: find the header marker and slice out the data region.
//!
//! ## Why a marker cell?
//!
//! The reconstructed grid covers the whole page (project title, legend,
//! revision table, signature block), not just the schedule. Rather than
//! guessing which rows are schedule rows by shape, the locator anchors on
//! the one cell that is always present in these documents: the literal
//! header text (`"ITEM"` by default) at the top of the task-number column.
//! Everything below it, four columns wide, is the schedule.
//!
//! The scan is row-major and the first match wins (lowest row index, then
//! lowest column index), so a stray occurrence of the marker further down
//! the page cannot steal the anchor from the real header.

use crate::error::Pdf2PlanError;
use crate::pipeline::grid::RawTable;

/// Width of the data region in columns: task number, description,
/// start date, end date.
pub const REGION_WIDTH: usize = 4;

/// One row of the located data region.
///
/// Cells that fall outside the source row (the grid was narrower than
/// [`REGION_WIDTH`] at the marker offset) are `None`, same as cells that
/// were present but empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    /// Raw task-number cell, matched against the sequential counter.
    pub task_number: Option<String>,
    /// Task or subtask description.
    pub description: Option<String>,
    /// Start date as printed in the document.
    pub start_date: Option<String>,
    /// End date as printed in the document.
    pub end_date: Option<String>,
}

impl RegionRow {
    /// Slice a raw grid row at the given column offset.
    fn from_row(row: &[Option<String>], col: usize) -> Self {
        let cell = |i: usize| row.get(col + i).cloned().flatten();
        Self {
            task_number: cell(0),
            description: cell(1),
            start_date: cell(2),
            end_date: cell(3),
        }
    }
}

/// Locate the data region of a raw grid.
///
/// Scans every cell in row-major order for the first one equal to `marker`,
/// then returns the rows strictly below it, sliced to [`REGION_WIDTH`]
/// columns starting at the marker's column. A grid narrower than the region
/// is padded with `None`, not an error.
///
/// # Errors
/// [`Pdf2PlanError::HeaderNotFound`] when no cell equals the marker.
pub fn locate_data_region(
    table: &RawTable,
    marker: &str,
) -> Result<Vec<RegionRow>, Pdf2PlanError> {
    let (row, col) = table
        .iter()
        .enumerate()
        .find_map(|(r, cells)| {
            cells
                .iter()
                .position(|cell| cell.as_deref() == Some(marker))
                .map(|c| (r, c))
        })
        .ok_or_else(|| Pdf2PlanError::HeaderNotFound {
            marker: marker.to_string(),
        })?;

    Ok(table[row + 1..]
        .iter()
        .map(|cells| RegionRow::from_row(cells, col))
        .collect())
}
