use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::processing::MatchCounts;
use crate::types::{ColumnMapping, InvalidRow};

use super::unified::IngestionFormat;

/// Severity classification used for failure callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Error-level event (the load failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// File name (or path) being loaded.
    pub file_name: String,
    /// Label of the schema used for the load.
    pub source_label: String,
    /// Format used for reading.
    pub format: IngestionFormat,
}

/// Structured progress events emitted by loaders and the matcher.
#[derive(Debug, Clone, Copy)]
pub enum ReconEvent<'a> {
    /// A file was loaded and its columns resolved.
    RowsParsed {
        source_label: &'a str,
        file_name: &'a str,
        valid_rows: usize,
        total_rows: usize,
        mapping: &'a ColumnMapping,
    },
    /// Some data rows were dropped. Emitted only when `count > 0`.
    InvalidRows {
        source_label: &'a str,
        file_name: &'a str,
        count: usize,
        /// Bounded sample, in sheet order.
        samples: &'a [InvalidRow],
    },
    /// A reconciliation run finished.
    MatchSummary {
        source_label: &'a str,
        counts: &'a MatchCounts,
    },
}

impl ReconEvent<'_> {
    /// Stable snake_case event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RowsParsed { .. } => "rows_parsed",
            Self::InvalidRows { .. } => "invalid_rows",
            Self::MatchSummary { .. } => "match_summary",
        }
    }
}

impl fmt::Display for ReconEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowsParsed {
                source_label,
                file_name,
                valid_rows,
                total_rows,
                mapping,
            } => write!(
                f,
                "rows_parsed source={source_label} file={file_name} valid={valid_rows} total={total_rows} {mapping}"
            ),
            Self::InvalidRows {
                source_label,
                file_name,
                count,
                samples,
            } => {
                let rows: Vec<String> = samples.iter().map(|r| r.row_number.to_string()).collect();
                write!(
                    f,
                    "invalid_rows source={source_label} file={file_name} count={count} sample_rows=[{}]",
                    rows.join(",")
                )
            }
            Self::MatchSummary { source_label, counts } => write!(
                f,
                "match_summary source={source_label} source_records={} accounting_records={} matched={} amount_differences={} source_only={} accounting_only={}",
                counts.source_records,
                counts.accounting_records,
                counts.matched,
                counts.amount_differences,
                counts.source_only,
                counts.accounting_only
            ),
        }
    }
}

/// Observer interface for load and reconciliation progress.
///
/// Implementors can record metrics, logs, or trigger alerts. All methods default to no-ops.
pub trait ReconObserver: Send + Sync {
    /// Called for every structured progress event.
    fn on_event(&self, _event: &ReconEvent<'_>) {}

    /// Called when a load fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a load failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReconObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ReconObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ReconObserver for CompositeObserver {
    fn on_event(&self, event: &ReconEvent<'_>) {
        for o in &self.observers {
            o.on_event(event);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReconObserver for StdErrObserver {
    fn on_event(&self, event: &ReconEvent<'_>) {
        eprintln!("[recon] {event}");
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[recon][{:?}] source={} format={:?} file={} err={}",
            severity, ctx.source_label, ctx.format, ctx.file_name, error
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ALERT][recon][{:?}] source={} format={:?} file={} err={}",
            severity, ctx.source_label, ctx.format, ctx.file_name, error
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ReconObserver for FileObserver {
    fn on_event(&self, event: &ReconEvent<'_>) {
        self.append_line(&format!("{} {event}", unix_ts()));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "{} fail severity={:?} source={} format={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.source_label,
            ctx.format,
            ctx.file_name,
            error
        ));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} source={} format={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.source_label,
            ctx.format,
            ctx.file_name,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
