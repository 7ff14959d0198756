//! # pdf2plan
//!
//! Extract hierarchical work-breakdown schedules from tabular PDFs into
//! structured XLSX spreadsheets.
//!
//! ## Why this crate?
//!
//! Construction and project-management tooling exports work-breakdown
//! schedules as PDFs: a table of numbered tasks, indented subtasks, and
//! start/end dates. Getting that data back into a planning tool usually
//! means retyping it. This crate reads the PDF text layer, reconstructs the
//! table by layout clustering, re-derives the two-level task/subtask
//! hierarchy from the numbering column, and writes a spreadsheet with
//! synthesised `N` / `N.M` numbering ready for import.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL, check %PDF magic
//!  ├─ 2. Grid      positioned text via pdfium → row×column cells (spawn_blocking)
//!  ├─ 3. Locate    find the "ITEM" header marker, slice the 4-column region
//!  ├─ 4. Classify  sequential-counter main-task detection
//!  ├─ 5. Build     one-row-lookahead task/subtask numbering
//!  └─ 6. Output    7-column XLSX + extraction stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2plan::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let schedule = extract("cronograma.pdf", &config).await?;
//!     for row in &schedule.rows {
//!         println!("{} {} {}", row.task_number, row.subtask_number, row.subtask_name);
//!     }
//!     eprintln!("{} tasks / {} subtasks", schedule.stats.tasks, schedule.stats.subtasks);
//!     Ok(())
//! }
//! ```
//!
//! Callers that already hold a grid (or want to skip the PDF layer in
//! tests) can run the pure core directly:
//!
//! ```rust
//! use pdf2plan::structure_table;
//!
//! let table = vec![
//!     vec![Some("ITEM".into()), Some("DESCRIPCION".into()), Some("INICIO".into()), Some("FIN".into())],
//!     vec![Some("1".into()), Some("Excavation".into()), Some("2024-01-01".into()), Some("2024-01-10".into())],
//! ];
//! let rows = structure_table(&table, "ITEM").unwrap();
//! assert_eq!(rows[0].task_number, 1);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2plan` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2plan = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageSelection};
pub use convert::{extract, extract_from_bytes, extract_sync, extract_to_file, structure_table};
pub use error::Pdf2PlanError;
pub use output::{ExtractionStats, Schedule, ScheduleRow};
pub use pipeline::grid::RawTable;
pub use pipeline::xlsx::{schedule_to_xlsx, COLUMN_HEADERS};
