//! Generic source loader: one implementation driven by a [`SourceSchema`] descriptor.

use crate::error::{IngestionError, IngestionResult};
use crate::normalize::{normalize_invoice, parse_date, parse_numeric_value};
use crate::resolver::find_column_by_names;
use crate::schema::SourceSchema;
use crate::types::{
    Cell, ColumnMapping, IngestionMetadata, InvalidReason, InvalidRow, LoadedSource, RawRecord,
    SheetData,
};

use super::observability::{ReconEvent, ReconObserver};

/// Default number of dropped rows kept in [`LoadedSource::invalid_samples`].
pub const DEFAULT_INVALID_SAMPLE_LIMIT: usize = 50;

/// Turn the rows of a sheet into validated records for `schema`.
///
/// - Fails with [`IngestionError::FileStructure`] when there is no data row below the header.
/// - Fails with [`IngestionError::SchemaResolution`] when the invoice or amount column cannot
///   be found. A missing date column is tolerated and every record gets `date: None`.
/// - Every data row counts towards `total_rows`, fully blank ones included.
/// - A row is kept iff its normalized invoice is non-empty and its amount is strictly
///   positive; other rows are counted as invalid and the first `sample_limit` are retained.
///
/// When an observer is given it receives `rows_parsed`, then `invalid_rows` if any row was
/// dropped.
pub fn load_sheet(
    sheet: SheetData,
    schema: &SourceSchema,
    sample_limit: usize,
    observer: Option<&dyn ReconObserver>,
) -> IngestionResult<LoadedSource> {
    if sheet.rows.len() < 2 {
        return Err(IngestionError::FileStructure {
            source_label: schema.source_label.clone(),
        });
    }

    let SheetData {
        file_name,
        sheet_count,
        rows,
    } = sheet;
    let mut rows = rows.into_iter().enumerate();
    let header = rows.next().map(|(_, r)| r).unwrap_or_default();

    let invoice_col = find_column_by_names(&header, &schema.invoice_candidates);
    let amount_col = find_column_by_names(&header, &schema.amount_candidates);
    let date_col = find_column_by_names(&header, &schema.date_candidates);

    let (Some(invoice_col), Some(amount_col)) = (invoice_col, amount_col) else {
        return Err(IngestionError::SchemaResolution {
            source_label: schema.source_label.clone(),
            invoice_field: schema.invoice_field.clone(),
            amount_field: schema.amount_field.clone(),
            headers: header.iter().map(Cell::to_text).collect(),
        });
    };

    let mut records: Vec<RawRecord> = Vec::new();
    let mut invalid_samples: Vec<InvalidRow> = Vec::new();
    let mut invalid_rows = 0usize;
    let mut total_rows = 0usize;

    for (idx0, row) in rows {
        total_rows += 1;

        let cell = |idx: usize| row.get(idx).unwrap_or(&Cell::Empty);
        let invoice_number = normalize_invoice(cell(invoice_col.index));
        let amount = parse_numeric_value(cell(amount_col.index));
        let date = date_col.as_ref().and_then(|c| parse_date(cell(c.index)));

        let reason = if invoice_number.is_empty() {
            Some(InvalidReason::EmptyInvoice)
        } else if amount.is_nan() || amount <= 0.0 {
            Some(InvalidReason::NonPositiveAmount)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                invalid_rows += 1;
                if invalid_samples.len() < sample_limit {
                    // Report 1-based row number (header is row 1).
                    invalid_samples.push(InvalidRow {
                        row_number: idx0 + 1,
                        reason,
                        cells: row,
                    });
                }
            }
            None => records.push(RawRecord {
                invoice_number,
                amount,
                date,
                raw_row: row,
            }),
        }
    }

    let mapping = ColumnMapping {
        invoice: invoice_col.header,
        amount: amount_col.header,
        date: date_col.map(|c| c.header),
    };
    let metadata = IngestionMetadata {
        file_name,
        sheet_count,
        total_rows,
        valid_rows: records.len(),
        invalid_rows,
    };

    if let Some(obs) = observer {
        obs.on_event(&ReconEvent::RowsParsed {
            source_label: &schema.source_label,
            file_name: &metadata.file_name,
            valid_rows: metadata.valid_rows,
            total_rows: metadata.total_rows,
            mapping: &mapping,
        });
        if invalid_rows > 0 {
            obs.on_event(&ReconEvent::InvalidRows {
                source_label: &schema.source_label,
                file_name: &metadata.file_name,
                count: invalid_rows,
                samples: &invalid_samples,
            });
        }
    }

    Ok(LoadedSource {
        source_label: schema.source_label.clone(),
        records,
        metadata,
        mapping,
        invalid_samples,
    })
}
