//! Grid reconstruction: positioned PDF text → rows × columns of cells.
//!
//! ## Why alignment clustering?
//!
//! pdfium hands back text as positioned fragments, not as a table. Schedule
//! PDFs are machine-generated, so their layout is highly regular: every
//! fragment of one table row shares a baseline to within a point or two,
//! and every fragment of one column starts at the same x offset. That makes
//! "stream" detection (inferring structure from text alignment, the same
//! approach pdfplumber's text strategy uses) reliable without ever looking
//! at ruling lines.
//!
//! Two clustering passes rebuild the grid: fragment vertical centres group
//! into rows, fragment left edges group into columns. A fragment lands in
//! the cell at the intersection of its row and column cluster; fragments
//! sharing a cell are joined left-to-right. Per-page grids are appended in
//! page order with no cross-page merging — the downstream locator does not
//! need it, it anchors on the header marker wherever it appears.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` keeps the Tokio workers free
//! while pdfium walks the document.

use crate::config::ExtractionConfig;
use crate::error::Pdf2PlanError;
use once_cell::sync::Lazy;
use pdfium_render::prelude::*;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

/// A raw extracted grid: ordered rows of ordered cells. Cells are `None`
/// when empty or absent; positions carry no identity beyond order.
pub type RawTable = Vec<Vec<Option<String>>>;

/// Result of the grid stage.
#[derive(Debug, Clone)]
pub struct GridExtraction {
    /// Per-page grids appended in page order.
    pub table: RawTable,
    /// Number of pages actually scanned.
    pub pages_scanned: usize,
}

/// One positioned piece of text on a page, in PDF points (y axis up).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextFragment {
    pub text: String,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl TextFragment {
    fn vertical_centre(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// Extract the raw grid from a PDF.
///
/// Opens the document, reads positioned text from every selected page, and
/// reconstructs a grid per page. Runs inside `spawn_blocking` since pdfium
/// operations are CPU-bound and not async-safe.
pub async fn extract_grid(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<GridExtraction, Pdf2PlanError> {
    let path = pdf_path.to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || extract_grid_blocking(&path, &config))
        .await
        .map_err(|e| Pdf2PlanError::Internal(format!("Grid task panicked: {}", e)))?
}

/// Blocking implementation of grid extraction.
fn extract_grid_blocking(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<GridExtraction, Pdf2PlanError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, config.password.as_deref())
        .map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if config.password.is_some() {
                    Pdf2PlanError::WrongPassword {
                        path: pdf_path.to_path_buf(),
                    }
                } else {
                    Pdf2PlanError::PasswordRequired {
                        path: pdf_path.to_path_buf(),
                    }
                }
            } else {
                Pdf2PlanError::CorruptPdf {
                    path: pdf_path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let page_indices = config.pages.to_indices(total_pages);
    let mut table: RawTable = Vec::new();

    for &idx in &page_indices {
        let page = pages
            .get(idx as u16)
            .map_err(|e| Pdf2PlanError::Internal(format!("Page {} load: {:?}", idx + 1, e)))?;

        let fragments = page_fragments(&page)?;
        let page_grid = build_page_grid(fragments, config.row_tolerance, config.column_tolerance);
        debug!(
            "Page {} → {} grid rows",
            idx + 1,
            page_grid.len()
        );
        table.extend(page_grid);
    }

    Ok(GridExtraction {
        table,
        pages_scanned: page_indices.len(),
    })
}

/// Bind to the pdfium shared library.
///
/// `PDFIUM_LIB_PATH` takes precedence; otherwise the system library search
/// path is used. Binding failure is an error, not a panic, so callers get
/// the actionable message from [`Pdf2PlanError::PdfiumBindingFailed`].
fn bind_pdfium() -> Result<Pdfium, Pdf2PlanError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(&path),
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| Pdf2PlanError::PdfiumBindingFailed(format!("{:?}", e)))?;
    Ok(Pdfium::new(bindings))
}

/// Read the positioned text fragments of one page.
fn page_fragments(page: &PdfPage) -> Result<Vec<TextFragment>, Pdf2PlanError> {
    let text = page
        .text()
        .map_err(|e| Pdf2PlanError::Internal(format!("Text extraction: {:?}", e)))?;

    let mut fragments = Vec::new();
    for segment in text.segments().iter() {
        let content = normalise_cell_text(&segment.text());
        if content.is_empty() {
            continue;
        }
        let bounds = segment.bounds();
        fragments.push(TextFragment {
            text: content,
            left: bounds.left.value,
            right: bounds.right.value,
            top: bounds.top.value,
            bottom: bounds.bottom.value,
        });
    }
    Ok(fragments)
}

/// Rebuild one page's grid from its text fragments.
///
/// Rows are ordered top-to-bottom (PDF y points up, so descending centre),
/// columns left-to-right. Fragments sharing a cell are joined in x order
/// with a single space.
pub(crate) fn build_page_grid(
    fragments: Vec<TextFragment>,
    row_tolerance: f32,
    column_tolerance: f32,
) -> RawTable {
    if fragments.is_empty() {
        return Vec::new();
    }

    let mut row_centres =
        cluster_values(fragments.iter().map(TextFragment::vertical_centre), row_tolerance);
    // Descending: highest y (top of page) first.
    row_centres.sort_by(|a, b| b.total_cmp(a));

    let column_starts = cluster_values(fragments.iter().map(|f| f.left), column_tolerance);

    let mut cells: Vec<Vec<Vec<&TextFragment>>> =
        vec![vec![Vec::new(); column_starts.len()]; row_centres.len()];
    for fragment in &fragments {
        let row = nearest(&row_centres, fragment.vertical_centre());
        let col = nearest(&column_starts, fragment.left);
        cells[row][col].push(fragment);
    }

    cells
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|mut cell| {
                    if cell.is_empty() {
                        return None;
                    }
                    cell.sort_by(|a, b| a.left.total_cmp(&b.left));
                    let joined = cell
                        .iter()
                        .map(|f| f.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    Some(joined)
                })
                .collect()
        })
        .collect()
}

/// Cluster 1-D positions into group centres.
///
/// Values are sorted and chained: a value joins the current group while it
/// sits within `tolerance` of the previous one, otherwise it opens a new
/// group. Each group is represented by its mean.
pub(crate) fn cluster_values(values: impl Iterator<Item = f32>, tolerance: f32) -> Vec<f32> {
    let mut sorted: Vec<f32> = values.collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut centres = Vec::new();
    let mut group: Vec<f32> = Vec::new();
    for v in sorted {
        match group.last() {
            Some(&last) if v - last <= tolerance => group.push(v),
            Some(_) => {
                centres.push(mean(&group));
                group.clear();
                group.push(v);
            }
            None => group.push(v),
        }
    }
    if !group.is_empty() {
        centres.push(mean(&group));
    }
    centres
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

/// Index of the centre closest to `value`.
fn nearest(centres: &[f32], value: f32) -> usize {
    centres
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

// ── Cell text normalisation ──────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse internal whitespace runs and trim. pdfium segments occasionally
/// carry embedded newlines and non-breaking spaces from justified layouts.
fn normalise_cell_text(raw: &str) -> String {
    let replaced = raw.replace('\u{00A0}', " ");
    RE_WHITESPACE.replace_all(replaced.trim(), " ").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, left: f32, top: f32) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            left,
            right: left + 30.0,
            top,
            bottom: top - 10.0,
        }
    }

    #[test]
    fn cluster_groups_nearby_values() {
        let centres = cluster_values([100.0, 101.5, 99.0, 50.0, 49.5].into_iter(), 3.0);
        assert_eq!(centres.len(), 2);
        assert!((centres[0] - 49.75).abs() < 0.01);
        assert!((centres[1] - 100.1667).abs() < 0.01);
    }

    #[test]
    fn cluster_keeps_distant_values_apart() {
        let centres = cluster_values([10.0, 20.0, 30.0].into_iter(), 3.0);
        assert_eq!(centres, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn cluster_of_empty_input_is_empty() {
        assert!(cluster_values(std::iter::empty::<f32>(), 3.0).is_empty());
    }

    #[test]
    fn nearest_picks_closest_centre() {
        let centres = [10.0, 50.0, 90.0];
        assert_eq!(nearest(&centres, 12.0), 0);
        assert_eq!(nearest(&centres, 55.0), 1);
        assert_eq!(nearest(&centres, 200.0), 2);
    }

    #[test]
    fn rows_ordered_top_to_bottom() {
        // Two rows: y=700 above y=650 on the page.
        let fragments = vec![
            fragment("lower", 72.0, 650.0),
            fragment("upper", 72.0, 700.0),
        ];
        let grid = build_page_grid(fragments, 5.0, 10.0);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0].as_deref(), Some("upper"));
        assert_eq!(grid[1][0].as_deref(), Some("lower"));
    }

    #[test]
    fn columns_ordered_left_to_right() {
        let fragments = vec![
            fragment("end", 400.0, 700.0),
            fragment("start", 72.0, 700.0),
            fragment("mid", 200.0, 700.0),
        ];
        let grid = build_page_grid(fragments, 5.0, 10.0);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), 3);
        assert_eq!(grid[0][0].as_deref(), Some("start"));
        assert_eq!(grid[0][1].as_deref(), Some("mid"));
        assert_eq!(grid[0][2].as_deref(), Some("end"));
    }

    #[test]
    fn baseline_jitter_lands_in_one_row() {
        let fragments = vec![
            fragment("a", 72.0, 700.0),
            fragment("b", 200.0, 701.8), // slightly raised baseline
        ];
        let grid = build_page_grid(fragments, 5.0, 10.0);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0][0].as_deref(), Some("a"));
        assert_eq!(grid[0][1].as_deref(), Some("b"));
    }

    #[test]
    fn empty_cells_are_none() {
        // Row 1 has both columns, row 2 only the second.
        let fragments = vec![
            fragment("1", 72.0, 700.0),
            fragment("Dig", 200.0, 700.0),
            fragment("Pour", 200.0, 650.0),
        ];
        let grid = build_page_grid(fragments, 5.0, 10.0);
        assert_eq!(grid[1][0], None);
        assert_eq!(grid[1][1].as_deref(), Some("Pour"));
    }

    #[test]
    fn fragments_sharing_a_cell_join_in_x_order() {
        let fragments = vec![
            fragment("footing", 230.0, 700.0),
            fragment("Pour", 200.0, 700.0),
        ];
        // Column tolerance wide enough that both left edges cluster together.
        let grid = build_page_grid(fragments, 5.0, 40.0);
        assert_eq!(grid[0][0].as_deref(), Some("Pour footing"));
    }

    #[test]
    fn no_fragments_no_grid() {
        assert!(build_page_grid(Vec::new(), 5.0, 10.0).is_empty());
    }

    #[test]
    fn normalise_collapses_whitespace() {
        assert_eq!(normalise_cell_text("  Pour \n footing\u{00A0} "), "Pour footing");
        assert_eq!(normalise_cell_text("\n \t"), "");
    }
}
