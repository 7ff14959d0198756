//! Extraction entry points.
//!
//! The orchestrator composes the pipeline stages linearly and owns the
//! stage timing and statistics. One call is one synchronous computation
//! over value-local data: the raw grid, region, and schedule live only for
//! the duration of the call, and every counter is re-initialised per call,
//! so repeated runs over the same input are independent and identical.

use crate::config::ExtractionConfig;
use crate::error::Pdf2PlanError;
use crate::output::{ExtractionStats, Schedule, ScheduleRow};
use crate::pipeline::grid::{self, RawTable};
use crate::pipeline::{classify, hierarchy, input, locate, xlsx};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Extract the structured schedule from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Extraction configuration
///
/// # Errors
/// Returns `Err(Pdf2PlanError)` when the input is not a readable PDF, the
/// document yields no text grid, or the grid has no header marker. There is
/// no partial output: callers get a complete [`Schedule`] or an error.
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<Schedule, Pdf2PlanError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Rebuild the raw grid ─────────────────────────────────────
    let grid_start = Instant::now();
    let extraction = grid::extract_grid(&pdf_path, config).await?;
    let extract_duration_ms = grid_start.elapsed().as_millis() as u64;
    info!(
        "Reconstructed {} grid rows from {} pages in {}ms",
        extraction.table.len(),
        extraction.pages_scanned,
        extract_duration_ms
    );

    if extraction.table.is_empty() {
        return Err(Pdf2PlanError::NoTablesFound);
    }

    // ── Step 3: Locate the data region ───────────────────────────────────
    let region = locate::locate_data_region(&extraction.table, &config.marker)?;
    let data_rows = region.len();
    debug!("Data region: {} rows below marker", data_rows);

    // ── Step 4+5: Classify and build the hierarchy ───────────────────────
    let classified = classify::classify(region);
    let rows = hierarchy::build_schedule(&classified);

    // ── Step 6: Stats ────────────────────────────────────────────────────
    let tasks = rows
        .iter()
        .map(|r| r.task_number)
        .collect::<BTreeSet<_>>()
        .len();
    let subtasks = rows.iter().filter(|r| !r.subtask_number.is_empty()).count();

    let stats = ExtractionStats {
        pages_scanned: extraction.pages_scanned,
        grid_rows: extraction.table.len(),
        data_rows,
        tasks,
        subtasks,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
    };

    info!(
        "Extraction complete: {} records ({} tasks, {} subtasks), {}ms total",
        rows.len(),
        stats.tasks,
        stats.subtasks,
        stats.total_duration_ms
    );

    Ok(Schedule { rows, stats })
}

/// Run the pure core pipeline over an already-extracted grid.
///
/// Locates the data region below `marker`, classifies the rows, and builds
/// the numbered schedule. Useful when the grid comes from another source
/// (tests, a different PDF backend, a CSV dump). Re-running on the same
/// table always produces an identical ordered record sequence.
pub fn structure_table(
    table: &RawTable,
    marker: &str,
) -> Result<Vec<ScheduleRow>, Pdf2PlanError> {
    let region = locate::locate_data_region(table, marker)?;
    let classified = classify::classify(region);
    Ok(hierarchy::build_schedule(&classified))
}

/// Extract a schedule and write the XLSX directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Pdf2PlanError> {
    let schedule = extract(input_str, config).await?;
    let bytes = xlsx::schedule_to_xlsx(&schedule.rows)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Pdf2PlanError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("xlsx.tmp");
    tokio::fs::write(&tmp_path, &bytes)
        .await
        .map_err(|e| Pdf2PlanError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2PlanError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(schedule.stats)
}

/// Extract a schedule from PDF bytes in memory.
///
/// This is the entry point for upload-style callers that hold the document
/// as a byte buffer. The bytes are validated first (`%PDF` magic; a non-PDF
/// upload is rejected before any extraction is attempted) and written to a
/// managed [`tempfile`] that is removed automatically on return or panic.
pub async fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<Schedule, Pdf2PlanError> {
    if bytes.len() < 4 {
        return Err(Pdf2PlanError::InvalidInput {
            input: format!("{}-byte buffer", bytes.len()),
        });
    }
    if &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2PlanError::NotAPdf {
            path: "<memory>".into(),
            magic,
        });
    }

    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| Pdf2PlanError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Pdf2PlanError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `extract` returns
    extract(&path, config).await
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<Schedule, Pdf2PlanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2PlanError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(input_str, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> RawTable {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|s| (!s.is_empty()).then(|| s.to_string()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn structure_table_runs_full_core_pipeline() {
        let raw = table(&[
            &["CRONOGRAMA DE OBRA", "", "", ""],
            &["ITEM", "DESCRIPCION", "INICIO", "FIN"],
            &["1", "Excavation", "2024-01-01", "2024-01-10"],
            &["2", "Concrete", "", ""],
            &["", "Pour footing", "2024-01-11", "2024-01-12"],
            &["", "Cure", "2024-01-13", "2024-01-20"],
        ]);
        let rows = structure_table(&raw, "ITEM").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].task_name, "Excavation");
        assert_eq!(rows[1].subtask_number, "2.1");
        assert_eq!(rows[2].subtask_number, "2.2");
    }

    #[test]
    fn structure_table_propagates_header_not_found() {
        let raw = table(&[&["no", "marker", "here", ""]]);
        let err = structure_table(&raw, "ITEM").unwrap_err();
        assert!(matches!(err, Pdf2PlanError::HeaderNotFound { .. }));
    }

    #[test]
    fn structure_table_is_idempotent() {
        let raw = table(&[
            &["ITEM", "DESC", "INICIO", "FIN"],
            &["1", "A", "", ""],
            &["", "a1", "x", "y"],
        ]);
        assert_eq!(
            structure_table(&raw, "ITEM").unwrap(),
            structure_table(&raw, "ITEM").unwrap()
        );
    }

    #[tokio::test]
    async fn bytes_without_pdf_magic_are_rejected_before_extraction() {
        let config = ExtractionConfig::default();
        let err = extract_from_bytes(b"<html>nope</html>", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2PlanError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn tiny_buffer_is_invalid_input() {
        let config = ExtractionConfig::default();
        let err = extract_from_bytes(b"%P", &config).await.unwrap_err();
        assert!(matches!(err, Pdf2PlanError::InvalidInput { .. }));
    }
}
