//! Unified loading entrypoint.
//!
//! Most callers should use [`load_from_path`], which reads the first sheet of a file and runs
//! the generic loader for a [`SourceSchema`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`ReconObserver`] is provided, progress events, failures and alerts are reported to it.

#[cfg(feature = "excel")]
use std::error::Error as StdError;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::schema::SourceSchema;
use crate::types::{LoadedSource, SheetData};

use super::csv;
use super::file_name_of;
use super::loader::{DEFAULT_INVALID_SAMPLE_LIMIT, load_sheet};
use super::observability::{IngestionContext, IngestionSeverity, ReconObserver};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values (read as a single-sheet workbook).
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Options controlling loading behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, auto-detect format from the file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for progress events, logging and alerts.
    pub observer: Option<Arc<dyn ReconObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
    /// Number of dropped rows retained in [`LoadedSource::invalid_samples`].
    pub invalid_sample_limit: usize,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("invalid_sample_limit", &self.invalid_sample_limit)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
            invalid_sample_limit: DEFAULT_INVALID_SAMPLE_LIMIT,
        }
    }
}

/// Load one export from disk for `schema`.
///
/// When an observer is configured, this function reports:
///
/// - `rows_parsed` / `invalid_rows` events on success
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use marketplace_recon::ingestion::{load_from_path, LoadOptions};
/// use marketplace_recon::schema::Marketplace;
///
/// # fn main() -> Result<(), marketplace_recon::IngestionError> {
/// let orders = load_from_path("shopee_orders.xlsx", &Marketplace::Shopee.schema(), &LoadOptions::default())?;
/// println!("{} valid of {}", orders.metadata.valid_rows, orders.metadata.total_rows);
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (stderr logging + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use marketplace_recon::ingestion::{load_from_path, IngestionSeverity, LoadOptions, StdErrObserver};
/// use marketplace_recon::schema::SourceSchema;
///
/// let opts = LoadOptions {
///     observer: Some(Arc::new(StdErrObserver)),
///     alert_at_or_above: IngestionSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = load_from_path("does_not_exist.csv", &SourceSchema::accurate(), &opts).unwrap_err();
/// ```
pub fn load_from_path(
    path: impl AsRef<Path>,
    schema: &SourceSchema,
    options: &LoadOptions,
) -> IngestionResult<LoadedSource> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_name(&path.display().to_string())?,
    };

    let ctx = IngestionContext {
        file_name: file_name_of(path),
        source_label: schema.source_label.clone(),
        format: fmt,
    };

    let result = read_sheet_from_path(path, fmt).and_then(|sheet| run_loader(sheet, schema, options));
    report_failure(&ctx, &result, options);
    result
}

/// Load one export from an in-memory buffer (e.g. a browser upload).
///
/// `file_name` is recorded in the metadata and used for format inference when
/// `options.format` is `None`.
pub fn load_from_bytes(
    file_name: &str,
    bytes: Vec<u8>,
    schema: &SourceSchema,
    options: &LoadOptions,
) -> IngestionResult<LoadedSource> {
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_name(file_name)?,
    };

    let ctx = IngestionContext {
        file_name: file_name.to_string(),
        source_label: schema.source_label.clone(),
        format: fmt,
    };

    let result = read_sheet_from_bytes(file_name, bytes, fmt).and_then(|sheet| run_loader(sheet, schema, options));
    report_failure(&ctx, &result, options);
    result
}

/// Read the first sheet of a file without applying any schema.
pub fn read_sheet_from_path(path: impl AsRef<Path>, format: IngestionFormat) -> IngestionResult<SheetData> {
    let path = path.as_ref();
    match format {
        IngestionFormat::Csv => csv::read_csv_from_path(path),
        IngestionFormat::Excel => read_excel_dispatch(path),
    }
}

/// Read the first sheet of an in-memory file without applying any schema.
pub fn read_sheet_from_bytes(
    file_name: &str,
    bytes: Vec<u8>,
    format: IngestionFormat,
) -> IngestionResult<SheetData> {
    match format {
        IngestionFormat::Csv => csv::read_csv_from_reader(file_name, Cursor::new(bytes)),
        IngestionFormat::Excel => read_excel_bytes_dispatch(file_name, bytes),
    }
}

fn run_loader(sheet: SheetData, schema: &SourceSchema, options: &LoadOptions) -> IngestionResult<LoadedSource> {
    load_sheet(
        sheet,
        schema,
        options.invalid_sample_limit,
        options.observer.as_deref(),
    )
}

fn report_failure(ctx: &IngestionContext, result: &IngestionResult<LoadedSource>, options: &LoadOptions) {
    let (Some(obs), Err(e)) = (options.observer.as_ref(), result) else {
        return;
    };
    let sev = severity_for_error(e);
    obs.on_failure(ctx, sev, e);
    if sev >= options.alert_at_or_above {
        obs.on_alert(ctx, sev, e);
    }
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(err) => {
            // Workbook readers wrap I/O failures in format-specific errors.
            if error_chain_contains_io(err) {
                IngestionSeverity::Critical
            } else {
                IngestionSeverity::Error
            }
        }
        IngestionError::Json(_) => IngestionSeverity::Error,
        IngestionError::FileStructure { .. } => IngestionSeverity::Error,
        IngestionError::SchemaResolution { .. } => IngestionSeverity::Error,
        IngestionError::UnsupportedFormat { .. } => IngestionSeverity::Error,
    }
}

#[cfg(feature = "excel")]
fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn infer_format_from_name(name: &str) -> IngestionResult<IngestionFormat> {
    let ext = Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::UnsupportedFormat {
            message: format!("cannot infer format: file has no extension ({name})"),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
        message: format!("cannot infer format from extension '{ext}' ({name})"),
    })
}

fn read_excel_dispatch(path: &Path) -> IngestionResult<SheetData> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_excel_first_sheet_from_path(path)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = path;
        Err(excel_disabled())
    }
}

fn read_excel_bytes_dispatch(file_name: &str, bytes: Vec<u8>) -> IngestionResult<SheetData> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_excel_first_sheet_from_bytes(file_name, bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (file_name, bytes);
        Err(excel_disabled())
    }
}

#[cfg(not(feature = "excel"))]
fn excel_disabled() -> IngestionError {
    IngestionError::UnsupportedFormat {
        message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
    }
}
