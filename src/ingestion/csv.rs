//! CSV reading. A CSV file is treated as a workbook with a single sheet.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{Cell, SheetData};

use super::file_name_of;

/// Read a CSV file into [`SheetData`].
///
/// Rules:
///
/// - The first record is the header row; no header semantics are applied here.
/// - Rows may have differing lengths.
/// - Every non-empty field becomes [`Cell::Text`]; number parsing is left to the normalizer.
/// - Invalid UTF-8 is replaced rather than rejected.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<SheetData> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_csv_from_reader(file_name_of(path), file)
}

/// Read CSV data from any reader (e.g. an uploaded byte buffer).
pub fn read_csv_from_reader<R: Read>(file_name: impl Into<String>, reader: R) -> IngestionResult<SheetData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let row = record
            .iter()
            .map(|field| {
                let text = String::from_utf8_lossy(field);
                if text.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(text.into_owned())
                }
            })
            .collect();
        rows.push(row);
    }

    if let Some(Cell::Text(first)) = rows.first_mut().and_then(|r| r.first_mut()) {
        if first.starts_with('\u{feff}') {
            first.remove(0);
        }
    }

    Ok(SheetData::new(file_name, 1, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ragged_rows_and_empty_fields() {
        let input = "Order ID,Total Amount,Date\nA-1,\"1,250.00\"\nA-2,,2024-01-02\n";
        let sheet = read_csv_from_reader("orders.csv", input.as_bytes()).unwrap();

        assert_eq!(sheet.file_name, "orders.csv");
        assert_eq!(sheet.sheet_count, 1);
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1], vec![Cell::text("A-1"), Cell::text("1,250.00")]);
        assert_eq!(sheet.rows[2][1], Cell::Empty);
    }

    #[test]
    fn strips_utf8_bom_from_first_header() {
        let input = "\u{feff}Faktur,Total\nF1,10\n";
        let sheet = read_csv_from_reader("acc.csv", input.as_bytes()).unwrap();
        assert_eq!(sheet.rows[0][0], Cell::text("Faktur"));
    }
}
