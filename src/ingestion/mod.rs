//! Loading entrypoints and implementations.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`LoadOptions`])
//! - reads the first sheet and resolves the invoice/amount/date columns for a
//!   [`crate::schema::SourceSchema`]
//! - optionally reports progress, failures and alerts to a [`ReconObserver`]
//!
//! Format-specific readers are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)
//!
//! and the schema-driven loader itself under [`loader`].

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod loader;
pub mod observability;
pub mod unified;

use std::path::Path;

pub use loader::{DEFAULT_INVALID_SAMPLE_LIMIT, load_sheet};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionSeverity, ReconEvent, ReconObserver,
    StdErrObserver,
};
pub use unified::{
    IngestionFormat, LoadOptions, load_from_bytes, load_from_path, read_sheet_from_bytes,
    read_sheet_from_path,
};

/// Last path component, falling back to the full path.
fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
