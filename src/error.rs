//! Error types for the pdf2plan library.
//!
//! One enum covers every failure the pipeline can surface. The taxonomy
//! follows the pipeline stages:
//!
//! * Input errors — the caller handed us something that is not a readable
//!   PDF. Rejected before any extraction is attempted.
//! * Extraction errors — the PDF opened but no usable table came out of it
//!   (no text at all, or no header marker cell).
//! * Output errors — the schedule was built but the spreadsheet could not
//!   be written.
//!
//! Every failure is returned as `Err(Pdf2PlanError)` from the top-level
//! `extract*` functions; nothing in the library panics on bad input. No
//! partial output is ever produced — callers get a complete schedule or an
//! error, never both.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2plan library.
#[derive(Debug, Error)]
pub enum Pdf2PlanError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The document produced no table rows at all (empty or image-only PDF).
    #[error("No tables found in the PDF.\nThe document may be scanned images rather than text.")]
    NoTablesFound,

    /// The extracted grid contains no header marker cell, so the data
    /// region cannot be located.
    #[error("Schedule header marker '{marker}' not found in the extracted table.\nIs this the right document? Override the marker with --marker.")]
    HeaderNotFound { marker: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The XLSX workbook could not be assembled.
    #[error("Failed to build spreadsheet: {0}")]
    SpreadsheetFailed(String),

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, or install the pdfium shared\n\
library for your platform from bblanchon/pdfium-binaries."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_not_found_display() {
        let e = Pdf2PlanError::HeaderNotFound {
            marker: "ITEM".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("ITEM"), "got: {msg}");
        assert!(msg.contains("--marker"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = Pdf2PlanError::NotAPdf {
            path: PathBuf::from("upload.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("upload.txt"));
    }

    #[test]
    fn download_timeout_display() {
        let e = Pdf2PlanError::DownloadTimeout {
            url: "https://example.com/plan.pdf".into(),
            secs: 120,
        };
        assert!(e.to_string().contains("120s"));
    }

    #[test]
    fn invalid_config_display() {
        let e = Pdf2PlanError::InvalidConfig("marker must not be empty".into());
        assert!(e.to_string().contains("marker must not be empty"));
    }
}
