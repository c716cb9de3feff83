use thiserror::Error;

/// Convenience result type for loading operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by loaders and the file-level pipeline.
///
/// Row-level problems (empty invoice, non-positive amount) are never reported here; those rows
/// are dropped and counted in [`crate::types::IngestionMetadata::invalid_rows`]. The matcher in
/// [`crate::processing`] cannot fail and has no error type of its own.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook could not be opened or read (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV reading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON schema descriptor could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The first sheet has no data row below the header.
    #[error("{source_label} file must contain at least headers and one data row")]
    FileStructure { source_label: String },

    /// The invoice or amount column could not be found in the header row.
    #[error(
        "could not find {invoice_field} and {amount_field} columns in {source_label} file (headers={headers:?})"
    )]
    SchemaResolution {
        source_label: String,
        invoice_field: String,
        amount_field: String,
        headers: Vec<String>,
    },

    /// The input format could not be inferred or is not enabled in this build.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
}
