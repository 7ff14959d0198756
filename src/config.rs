//! Configuration types for schedule extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`],
//! built via its [`ExtractionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share configs, serialise them for logging,
//! and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A constructor with half a dozen positional fields breaks on every new
//! field. The builder lets callers set only what they care about and rely
//! on documented defaults for the rest.

use crate::error::Pdf2PlanError;
use serde::{Deserialize, Serialize};

/// Configuration for a PDF schedule extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2plan::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .marker("ITEM")
///     .row_tolerance(4.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ExtractionConfig {
    /// Header marker cell text that anchors the data table. Default: `"ITEM"`.
    ///
    /// The extracted grid usually contains more than the schedule itself
    /// (titles, legends, signature blocks). The marker identifies the header
    /// row of the schedule table; the data region starts one row below it.
    /// Compared with exact string equality against normalised cell text.
    pub marker: String,

    /// Vertical clustering tolerance in PDF points. Default: 5.0.
    ///
    /// Text fragments whose vertical centres differ by no more than this are
    /// treated as one table row. 5 pt absorbs baseline jitter from mixed
    /// font sizes without merging adjacent 10–12 pt rows.
    pub row_tolerance: f32,

    /// Horizontal clustering tolerance in PDF points. Default: 10.0.
    ///
    /// Fragment left edges within this distance are treated as one column.
    /// Column starts in generated schedule PDFs line up within a point or
    /// two; 10 pt also tolerates hand-tweaked layouts while staying well
    /// below typical inter-column gaps (30+ pt).
    pub column_tolerance: f32,

    /// Page selection. Default: all pages, appended in page order.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            marker: "ITEM".to_string(),
            row_tolerance: 5.0,
            column_tolerance: 10.0,
            pages: PageSelection::default(),
            password: None,
            download_timeout_secs: 120,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.config.marker = marker.into();
        self
    }

    pub fn row_tolerance(mut self, pts: f32) -> Self {
        self.config.row_tolerance = pts;
        self
    }

    pub fn column_tolerance(mut self, pts: f32) -> Self {
        self.config.column_tolerance = pts;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2PlanError> {
        let c = &self.config;
        if c.marker.is_empty() {
            return Err(Pdf2PlanError::InvalidConfig(
                "marker must not be empty".into(),
            ));
        }
        if !(c.row_tolerance > 0.0) || !c.row_tolerance.is_finite() {
            return Err(Pdf2PlanError::InvalidConfig(format!(
                "row_tolerance must be a positive number, got {}",
                c.row_tolerance
            )));
        }
        if !(c.column_tolerance > 0.0) || !c.column_tolerance.is_finite() {
            return Err(Pdf2PlanError::InvalidConfig(format!(
                "column_tolerance must be a positive number, got {}",
                c.column_tolerance
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to scan for schedule rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Scan all pages (default).
    #[default]
    All,
    /// Scan a single page (1-indexed).
    Single(usize),
    /// Scan a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Scan specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marker_is_item() {
        assert_eq!(ExtractionConfig::default().marker, "ITEM");
    }

    #[test]
    fn builder_rejects_empty_marker() {
        let err = ExtractionConfig::builder().marker("").build();
        assert!(matches!(err, Err(Pdf2PlanError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_zero_tolerance() {
        let err = ExtractionConfig::builder().row_tolerance(0.0).build();
        assert!(matches!(err, Err(Pdf2PlanError::InvalidConfig(_))));

        let err = ExtractionConfig::builder().column_tolerance(-1.0).build();
        assert!(matches!(err, Err(Pdf2PlanError::InvalidConfig(_))));
    }

    #[test]
    fn builder_accepts_custom_marker() {
        let config = ExtractionConfig::builder()
            .marker("RUBRO")
            .build()
            .unwrap();
        assert_eq!(config.marker, "RUBRO");
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![1, 3, 5]).to_indices(5),
            vec![0, 2, 4]
        );
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }
}
