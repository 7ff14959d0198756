//! Spreadsheet output: serialise schedule rows into an XLSX workbook.
//!
//! The seven columns and their order are the external contract of the
//! output file. Downstream planning tools import it by header name, so
//! the Spanish headers are written exactly as the consuming side expects
//! them. `Rubro Principal` (the task number) is a number cell so the
//! importing side can sort on it; everything else, dates included, stays
//! text because extraction applies no date-format validation.

use crate::error::Pdf2PlanError;
use crate::output::ScheduleRow;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// Output column headers, in contract order.
pub const COLUMN_HEADERS: [&str; 7] = [
    "Numero de OT",
    "Rubro Principal",
    "Detalle Rubro",
    "Numero de Actividad",
    "Detalle de Rubro",
    "Fecha inicio",
    "Fecha fin",
];

/// Worksheet name of the structured schedule.
const SHEET_NAME: &str = "Tareas";

/// Serialise the schedule into an in-memory XLSX buffer.
pub fn schedule_to_xlsx(rows: &[ScheduleRow]) -> Result<Vec<u8>, Pdf2PlanError> {
    build_workbook(rows)?
        .save_to_buffer()
        .map_err(xlsx_error)
}

/// Build the workbook: one bold header row, one row per record.
fn build_workbook(rows: &[ScheduleRow]) -> Result<Workbook, Pdf2PlanError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    let header_format = Format::new().set_bold();
    for (col, header) in COLUMN_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx_error)?;
        // Wide enough for the headers and typical descriptions.
        worksheet
            .set_column_width(col as u16, 18)
            .map_err(xlsx_error)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet
            .write_string(r, 0, &row.ot_number)
            .and_then(|ws| ws.write_number(r, 1, row.task_number as f64))
            .and_then(|ws| ws.write_string(r, 2, &row.task_name))
            .and_then(|ws| ws.write_string(r, 3, &row.subtask_number))
            .and_then(|ws| ws.write_string(r, 4, &row.subtask_name))
            .and_then(|ws| ws.write_string(r, 5, &row.start_date))
            .and_then(|ws| ws.write_string(r, 6, &row.end_date))
            .map_err(xlsx_error)?;
    }

    Ok(workbook)
}

fn xlsx_error(e: XlsxError) -> Pdf2PlanError {
    Pdf2PlanError::SpreadsheetFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ScheduleRow> {
        vec![
            ScheduleRow {
                ot_number: String::new(),
                task_number: 1,
                task_name: "Excavation".into(),
                subtask_number: String::new(),
                subtask_name: String::new(),
                start_date: "2024-01-01".into(),
                end_date: "2024-01-10".into(),
            },
            ScheduleRow {
                ot_number: String::new(),
                task_number: 2,
                task_name: "Concrete".into(),
                subtask_number: "2.1".into(),
                subtask_name: "Pour footing".into(),
                start_date: "2024-01-11".into(),
                end_date: "2024-01-12".into(),
            },
        ]
    }

    #[test]
    fn buffer_is_a_zip_archive() {
        let bytes = schedule_to_xlsx(&sample_rows()).unwrap();
        // XLSX is a ZIP container; PK magic is the cheapest sanity check.
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_schedule_still_produces_header_only_workbook() {
        let bytes = schedule_to_xlsx(&[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn header_count_matches_record_fields() {
        // ScheduleRow serialises field-by-field into the seven columns.
        assert_eq!(COLUMN_HEADERS.len(), 7);
    }
}
