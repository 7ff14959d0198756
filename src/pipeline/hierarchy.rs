//! Hierarchy building: number the classified rows into tasks and subtasks.
//!
//! ## One-row lookahead
//!
//! Whether a main-task row stands alone or owns the subtask rows after it
//! is only decidable by peeking at the next row. The walk therefore runs on
//! a [`Peekable`] window; past the last row the lookahead reports a virtual
//! main-task boundary (`next_is_main = true`), so the final row of a table
//! is always closed out and never left as an orphaned continuation.
//!
//! ## Counter convention
//!
//! The task counter is deliberately asymmetric, matching the numbering the
//! source tooling produces: a standalone task consumes its number
//! immediately, but a task that owns subtasks only consumes its number when
//! its *last* subtask is emitted. A `(main, next-main)` header row emits
//! nothing at all; its name and dates surface through the subtask records
//! that follow. Do not "simplify" the increments without re-checking the
//! emitted numbering against the transition tests below.
//!
//! [`Peekable`]: std::iter::Peekable

use crate::output::ScheduleRow;
use crate::pipeline::classify::ClassifiedRow;

/// Walk the classified rows in document order and emit the structured
/// schedule records.
///
/// State across the walk is three locals: the task counter, the subtask
/// counter, and the current parent-task name. All three are scoped to this
/// call, so the transformation is reentrant and idempotent: the same input
/// always yields the same ordered output.
pub fn build_schedule(rows: &[ClassifiedRow]) -> Vec<ScheduleRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut task_counter: u32 = 1;
    let mut subtask_counter: u32 = 1;
    let mut current_task_name = String::new();

    let mut iter = rows.iter().peekable();
    while let Some(current) = iter.next() {
        // Virtual trailing boundary: past the end, the "next" row is a main task.
        let next_is_main = iter.peek().map_or(true, |next| next.is_main_task);
        let description = current.row.description.clone().unwrap_or_default();
        let start_date = current.row.start_date.clone().unwrap_or_default();
        let end_date = current.row.end_date.clone().unwrap_or_default();

        match (current.is_main_task, next_is_main) {
            // Standalone task: no subtasks follow.
            (true, true) => {
                out.push(ScheduleRow {
                    ot_number: String::new(),
                    task_number: task_counter,
                    task_name: description.clone(),
                    subtask_number: String::new(),
                    subtask_name: String::new(),
                    start_date,
                    end_date,
                });
                task_counter += 1;
                current_task_name = description;
            }
            // Header of an upcoming subtask block: emits nothing yet.
            (true, false) => {
                current_task_name = description;
                subtask_counter = 1;
            }
            // Subtask row; the lookahead decides which counter moves.
            (false, closes_parent) => {
                out.push(ScheduleRow {
                    ot_number: String::new(),
                    task_number: task_counter,
                    task_name: current_task_name.clone(),
                    subtask_number: format!("{task_counter}.{subtask_counter}"),
                    subtask_name: description,
                    start_date,
                    end_date,
                });
                if closes_parent {
                    task_counter += 1;
                } else {
                    subtask_counter += 1;
                }
            }
        }
    }

    out
}
