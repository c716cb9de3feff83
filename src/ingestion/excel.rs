#![cfg(feature = "excel")]

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};

use crate::error::IngestionResult;
use crate::types::{Cell, SheetData};

use super::file_name_of;

/// Read the first sheet of a workbook (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).
///
/// Behavior:
/// - Only the first sheet is read; [`SheetData::sheet_count`] reports how many exist
/// - Leading all-empty rows are skipped, so the first non-empty row becomes the header row
/// - Rows start at the first used column (a table starting at column C has the column C value
///   at index 0)
/// - Empty rows inside the table are kept as rows of empty cells
/// - Date-formatted cells are returned as their numeric day serial
pub fn read_excel_first_sheet_from_path(path: impl AsRef<Path>) -> IngestionResult<SheetData> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    read_first_sheet(&mut workbook, file_name_of(path))
}

/// Same as [`read_excel_first_sheet_from_path`], for an in-memory upload.
///
/// The workbook type is sniffed from the content; `file_name` is only used for metadata.
pub fn read_excel_first_sheet_from_bytes(
    file_name: impl Into<String>,
    bytes: Vec<u8>,
) -> IngestionResult<SheetData> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_first_sheet(&mut workbook, file_name.into())
}

fn read_first_sheet<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    file_name: String,
) -> IngestionResult<SheetData> {
    let names = workbook.sheet_names();
    let Some(first) = names.first() else {
        return Ok(SheetData::new(file_name, 0, Vec::new()));
    };

    let range = workbook.worksheet_range(first)?;
    let rows: Vec<Vec<Cell>> = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)))
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(SheetData::new(file_name, names.len(), rows))
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // Formula errors (#N/A, #REF!, ...) carry no usable value.
        Data::Error(_) => Cell::Empty,
    }
}
