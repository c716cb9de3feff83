use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Batch events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    BatchStarted { jobs: usize },
    JobStarted { index: usize, source_label: String },
    JobFinished {
        index: usize,
        source_label: String,
        succeeded: bool,
        elapsed: Duration,
    },
    BatchFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for batch execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::BatchStarted { jobs } => eprintln!("[recon][batch_started] jobs={jobs}"),
            ExecutionEvent::JobStarted { index, source_label } => {
                eprintln!("[recon][job_started] index={index} source={source_label}")
            }
            ExecutionEvent::JobFinished {
                index,
                source_label,
                succeeded,
                elapsed,
            } => eprintln!(
                "[recon][job_finished] index={index} source={source_label} ok={succeeded} elapsed={elapsed:?}"
            ),
            ExecutionEvent::BatchFinished { elapsed, metrics } => {
                eprintln!("[recon][batch_finished] elapsed={elapsed:?} {metrics}")
            }
        }
    }
}

/// Live counters for a batch run.
///
/// The engine updates these while jobs run; callers can snapshot them at any time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    jobs_started: AtomicU64,
    jobs_succeeded: AtomicU64,
    jobs_failed: AtomicU64,
    results_produced: AtomicU64,

    active_jobs: AtomicUsize,
    max_active_jobs: AtomicUsize,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            jobs_started: AtomicU64::new(0),
            jobs_succeeded: AtomicU64::new(0),
            jobs_failed: AtomicU64::new(0),
            results_produced: AtomicU64::new(0),
            active_jobs: AtomicUsize::new(0),
            max_active_jobs: AtomicUsize::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.jobs_started.store(0, Ordering::SeqCst);
        self.jobs_succeeded.store(0, Ordering::SeqCst);
        self.jobs_failed.store(0, Ordering::SeqCst);
        self.results_produced.store(0, Ordering::SeqCst);
        self.active_jobs.store(0, Ordering::SeqCst);
        self.max_active_jobs.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_job_start(&self) {
        let _ = self.jobs_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_jobs.fetch_add(1, Ordering::SeqCst) + 1;
        update_max_usize(&self.max_active_jobs, now);
    }

    /// `results` is the number of result lines a successful job produced.
    pub fn on_job_end(&self, results: Option<usize>) {
        match results {
            Some(n) => {
                let _ = self.jobs_succeeded.fetch_add(1, Ordering::SeqCst);
                let _ = self.results_produced.fetch_add(n as u64, Ordering::SeqCst);
            }
            None => {
                let _ = self.jobs_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        let _ = self.active_jobs.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            jobs_started: self.jobs_started.load(Ordering::SeqCst),
            jobs_succeeded: self.jobs_succeeded.load(Ordering::SeqCst),
            jobs_failed: self.jobs_failed.load(Ordering::SeqCst),
            results_produced: self.results_produced.load(Ordering::SeqCst),
            max_active_jobs: self.max_active_jobs.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn update_max_usize(dst: &AtomicUsize, now: usize) {
    let _ = dst.fetch_max(now, Ordering::SeqCst);
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub jobs_started: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
    pub results_produced: u64,
    pub max_active_jobs: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, jobs={}/{} (failed={}), results={}, max_active_jobs={}, elapsed={:?}",
            self.run_id,
            self.jobs_succeeded + self.jobs_failed,
            self.jobs_started,
            self.jobs_failed,
            self.results_produced,
            self.max_active_jobs,
            self.elapsed,
        )
    }
}
