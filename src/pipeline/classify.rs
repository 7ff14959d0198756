//! Row classification: tell main-task rows apart from subtask rows.
//!
//! ## The sequential-counter heuristic
//!
//! Source documents number their top-level tasks `1`, `2`, `3`, … in the
//! first column, while subtask rows leave it blank (or carry continuation
//! text). The classifier walks the region once with a single `expected`
//! counter starting at 1: a row whose task-number cell textually equals the
//! counter is a main-task row and advances the counter; every other row is
//! a subtask/continuation row and leaves the counter untouched.
//!
//! The match is greedy and forward-only: once a row is consumed as task
//! `k`, no earlier row is ever reinterpreted, and the counter never resets
//! within one document. Known limitation, kept deliberately: a source whose
//! numbering restarts or skips values (e.g. `1, 2, 5`) will have the
//! out-of-sequence rows classified as subtasks.

use crate::pipeline::locate::RegionRow;

/// A data-region row tagged with the main-task/subtask decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    /// The underlying region row.
    pub row: RegionRow,
    /// True when the task-number cell matched the running counter.
    pub is_main_task: bool,
}

/// Classify every row of the data region.
///
/// An absent or empty task-number cell can never equal the decimal form of
/// a positive integer, so such rows come out as subtask rows by
/// construction.
pub fn classify(region: Vec<RegionRow>) -> Vec<ClassifiedRow> {
    let mut expected: u32 = 1;
    region
        .into_iter()
        .map(|row| {
            let is_main_task = row.task_number.as_deref() == Some(expected.to_string().as_str());
            if is_main_task {
                expected += 1;
            }
            ClassifiedRow { row, is_main_task }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_row(task_number: &str, description: &str) -> RegionRow {
        RegionRow {
            task_number: (!task_number.is_empty()).then(|| task_number.to_string()),
            description: Some(description.to_string()),
            start_date: None,
            end_date: None,
        }
    }

    fn flags(rows: &[ClassifiedRow]) -> Vec<bool> {
        rows.iter().map(|r| r.is_main_task).collect()
    }

    #[test]
    fn sequential_numbers_are_main_tasks() {
        let region = vec![
            region_row("1", "a"),
            region_row("2", "b"),
            region_row("3", "c"),
        ];
        assert_eq!(flags(&classify(region)), vec![true, true, true]);
    }

    #[test]
    fn blank_cells_are_subtasks_and_do_not_advance() {
        let region = vec![
            region_row("1", "task"),
            region_row("", "sub"),
            region_row("", "sub"),
            region_row("2", "task"),
        ];
        assert_eq!(flags(&classify(region)), vec![true, false, false, true]);
    }

    #[test]
    fn counter_advances_exactly_once_per_match() {
        // A second "1" after the counter moved on is not a main task.
        let region = vec![
            region_row("1", "a"),
            region_row("1", "dup"),
            region_row("2", "b"),
        ];
        assert_eq!(flags(&classify(region)), vec![true, false, true]);
    }

    #[test]
    fn out_of_sequence_numbers_stay_subtasks() {
        // Documented heuristic behaviour: "5" never matches while the
        // counter expects 2, so it is classified as a subtask row.
        let region = vec![
            region_row("1", "a"),
            region_row("5", "skip"),
            region_row("2", "b"),
        ];
        assert_eq!(flags(&classify(region)), vec![true, false, true]);
    }

    #[test]
    fn match_is_textual_not_numeric() {
        // "01" and "2.0" are not the decimal text forms of 1 and 2.
        let region = vec![region_row("01", "a"), region_row("2.0", "b")];
        assert_eq!(flags(&classify(region)), vec![false, false]);
    }

    #[test]
    fn first_expected_value_is_one() {
        let region = vec![region_row("2", "starts at two")];
        assert_eq!(flags(&classify(region)), vec![false]);
    }

    #[test]
    fn empty_region_classifies_to_empty() {
        assert!(classify(Vec::new()).is_empty());
    }
}
