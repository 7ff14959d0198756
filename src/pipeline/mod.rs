//! Pipeline stages for PDF schedule extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the PDF backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ grid ──▶ locate ──▶ classify ──▶ hierarchy ──▶ xlsx
//! (URL/path) (pdfium)  (marker)   (counter)    (lookahead)   (workbook)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local
//!    file, rejecting non-PDF content before anything else runs
//! 2. [`grid`]      — read positioned text via pdfium and rebuild the raw
//!    row×column grid; runs in `spawn_blocking` because pdfium is not
//!    async-safe
//! 3. [`locate`]    — find the header marker cell and slice the 4-column
//!    data region below it
//! 4. [`classify`]  — tag each region row as main task or subtask with the
//!    sequential-counter heuristic
//! 5. [`hierarchy`] — walk the rows with one-row lookahead and synthesise
//!    the `N` / `N.M` numbering
//! 6. [`xlsx`]      — serialise the records into the 7-column workbook

pub mod classify;
pub mod grid;
pub mod hierarchy;
pub mod input;
pub mod locate;
pub mod xlsx;
