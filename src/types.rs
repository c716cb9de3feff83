//! Core data model types shared by loading and reconciliation.
//!
//! A spreadsheet is read into a [`SheetData`] of untyped [`Cell`]s; the loader turns it into a
//! [`LoadedSource`] holding validated [`RawRecord`]s plus [`IngestionMetadata`].

use std::fmt;

use serde::Serialize;

/// A single raw, untyped cell value as read from the first sheet of a file.
///
/// Serializes untagged: numbers as JSON numbers, text as strings, empty cells as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing/empty cell.
    Empty,
    /// Numeric cell. Spreadsheet date cells are kept as their day serial.
    Number(f64),
    /// Text cell.
    Text(String),
    /// Boolean cell.
    Bool(bool),
}

impl Cell {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// `true` for the values loose spreadsheet tooling treats as "no value": empty cells, empty
    /// text, `0`, `NaN` and `false`.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Bool(b) => !*b,
        }
    }

    /// Text coercion used for headers and identifiers.
    ///
    /// Whole numbers render without a fractional part (`1234.0` becomes `"1234"`).
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Rows of the first sheet of a file, header row included, plus workbook facts.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    /// File name reported in [`IngestionMetadata::file_name`].
    pub file_name: String,
    /// Number of sheets in the workbook (always `1` for CSV).
    pub sheet_count: usize,
    /// Row-major cells; `rows[0]` is the header row when present.
    pub rows: Vec<Vec<Cell>>,
}

impl SheetData {
    /// Create sheet data from raw rows.
    pub fn new(file_name: impl Into<String>, sheet_count: usize, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            file_name: file_name.into(),
            sheet_count,
            rows,
        }
    }

    /// The header row, if any row exists.
    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// All rows below the header.
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// A validated row from one side of the reconciliation.
///
/// Records produced by the loader always carry a non-empty, uppercased invoice and a strictly
/// positive amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    pub invoice_number: String,
    pub amount: f64,
    /// ISO `YYYY-MM-DD`, or `None` when the date column is missing or unparseable.
    pub date: Option<String>,
    pub raw_row: Vec<Cell>,
}

impl RawRecord {
    /// Build a record directly (no normalization is applied).
    pub fn new(invoice_number: impl Into<String>, amount: f64) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            amount,
            date: None,
            raw_row: Vec::new(),
        }
    }

    /// Attach an ISO date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Per-file ingestion summary, consumed by status displays only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionMetadata {
    pub file_name: String,
    pub sheet_count: usize,
    /// Data rows below the header.
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
}

/// Which header was chosen for each semantic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub invoice: String,
    pub amount: String,
    pub date: Option<String>,
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invoice='{}' amount='{}' date='{}'",
            self.invoice,
            self.amount,
            self.date.as_deref().unwrap_or("not found")
        )
    }
}

/// Why a data row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// The invoice cell normalized to an empty string.
    EmptyInvoice,
    /// The amount parsed to zero or less (including unparseable text).
    NonPositiveAmount,
}

/// A dropped data row kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidRow {
    /// 1-based spreadsheet row number (the header is row 1).
    pub row_number: usize,
    pub reason: InvalidReason,
    pub cells: Vec<Cell>,
}

/// Output of a source loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedSource {
    pub source_label: String,
    pub records: Vec<RawRecord>,
    pub metadata: IngestionMetadata,
    pub mapping: ColumnMapping,
    /// Bounded sample of dropped rows, in sheet order.
    pub invalid_samples: Vec<InvalidRow>,
}
