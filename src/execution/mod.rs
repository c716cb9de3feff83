//! Reconciliation pipelines: load both exports, reconcile, summarize.
//!
//! This module sits "above" [`crate::ingestion`] and [`crate::processing`] and provides:
//!
//! - [`reconcile_files`] / [`reconcile_bytes`]: one marketplace export against the accounting export
//! - [`ExecutionEngine`]: several such jobs on a rayon pool, with metrics + observer hooks

mod observer;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use serde::Serialize;

use crate::error::IngestionResult;
use crate::ingestion::{LoadOptions, load_from_bytes, load_from_path};
use crate::processing::{ReconSummary, ResultFilter, ResultRecord, filter_results, reconcile_observed};
use crate::schema::SourceSchema;
use crate::types::LoadedSource;

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

/// Everything one reconciliation run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReconOutcome {
    /// The marketplace side as loaded.
    pub source: LoadedSource,
    /// The accounting side as loaded.
    pub accounting: LoadedSource,
    pub results: Vec<ResultRecord>,
    pub summary: ReconSummary,
}

impl ReconOutcome {
    /// Reconcile two already-loaded sides.
    pub fn from_sources(source: LoadedSource, accounting: LoadedSource, options: &LoadOptions) -> Self {
        let results = reconcile_observed(
            &source.records,
            &accounting.records,
            &source.source_label,
            options.observer.as_deref(),
        );
        let summary = ReconSummary::from_results(&results);
        Self {
            source,
            accounting,
            results,
            summary,
        }
    }

    /// Results passing `filter`, in output order.
    pub fn filtered(&self, filter: &ResultFilter) -> Vec<&ResultRecord> {
        filter_results(&self.results, filter)
    }
}

/// Load a marketplace export with `schema` and the accounting export with
/// [`SourceSchema::accurate`], then reconcile them.
///
/// Either load failing fails the whole run; the marketplace side is loaded first.
///
/// ```no_run
/// use marketplace_recon::execution::reconcile_files;
/// use marketplace_recon::ingestion::LoadOptions;
/// use marketplace_recon::schema::Marketplace;
///
/// # fn main() -> Result<(), marketplace_recon::IngestionError> {
/// let out = reconcile_files(
///     "shopee_orders.xlsx",
///     "accurate_sales.xlsx",
///     &Marketplace::Shopee.schema(),
///     &LoadOptions::default(),
/// )?;
/// println!("match rate {}%", out.summary.match_rate);
/// # Ok(())
/// # }
/// ```
pub fn reconcile_files(
    marketplace_path: impl Into<PathBuf>,
    accounting_path: impl Into<PathBuf>,
    schema: &SourceSchema,
    options: &LoadOptions,
) -> IngestionResult<ReconOutcome> {
    let source = load_from_path(marketplace_path.into(), schema, options)?;
    let accounting = load_from_path(accounting_path.into(), &SourceSchema::accurate(), options)?;
    Ok(ReconOutcome::from_sources(source, accounting, options))
}

/// [`reconcile_files`] over in-memory uploads. Each side is `(file_name, bytes)`; the file name
/// drives format inference unless `options.format` is set.
pub fn reconcile_bytes(
    marketplace: (&str, Vec<u8>),
    accounting: (&str, Vec<u8>),
    schema: &SourceSchema,
    options: &LoadOptions,
) -> IngestionResult<ReconOutcome> {
    let source = load_from_bytes(marketplace.0, marketplace.1, schema, options)?;
    let accounting = load_from_bytes(accounting.0, accounting.1, &SourceSchema::accurate(), options)?;
    Ok(ReconOutcome::from_sources(source, accounting, options))
}

/// One marketplace export to reconcile against an accounting export.
#[derive(Debug, Clone)]
pub struct ReconJob {
    pub marketplace_path: PathBuf,
    pub accounting_path: PathBuf,
    pub schema: SourceSchema,
}

impl ReconJob {
    pub fn new(
        marketplace_path: impl Into<PathBuf>,
        accounting_path: impl Into<PathBuf>,
        schema: SourceSchema,
    ) -> Self {
        Self {
            marketplace_path: marketplace_path.into(),
            accounting_path: accounting_path.into(),
            schema,
        }
    }

    /// Execute the job by calling [`reconcile_files`].
    pub fn run(&self, options: &LoadOptions) -> IngestionResult<ReconOutcome> {
        reconcile_files(&self.marketplace_path, &self.accounting_path, &self.schema, options)
    }
}

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

/// Runs batches of [`ReconJob`]s on a dedicated rayon pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// `num_threads == Some(0)` is treated as one thread.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ThreadPoolBuildError> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run every job in parallel. Results are returned in job order; one failing job does not
    /// affect the others.
    pub fn run_batch(&self, jobs: &[ReconJob], options: &LoadOptions) -> Vec<IngestionResult<ReconOutcome>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::BatchStarted { jobs: jobs.len() });

        let out: Vec<IngestionResult<ReconOutcome>> = self.pool.install(|| {
            jobs.par_iter()
                .enumerate()
                .map(|(index, job)| self.run_one(index, job, options))
                .collect()
        });

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::BatchFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        out
    }

    fn run_one(&self, index: usize, job: &ReconJob, options: &LoadOptions) -> IngestionResult<ReconOutcome> {
        let start = Instant::now();
        self.metrics.on_job_start();
        self.emit(ExecutionEvent::JobStarted {
            index,
            source_label: job.schema.source_label.clone(),
        });

        let result = job.run(options);

        self.metrics
            .on_job_end(result.as_ref().ok().map(|o| o.results.len()));
        self.emit(ExecutionEvent::JobFinished {
            index,
            source_label: job.schema.source_label.clone(),
            succeeded: result.is_ok(),
            elapsed: start.elapsed(),
        });
        result
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
