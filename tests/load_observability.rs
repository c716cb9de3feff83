use std::sync::{Arc, Mutex};

use marketplace_recon::execution::reconcile_files;
use marketplace_recon::ingestion::{
    CompositeObserver, FileObserver, IngestionContext, IngestionFormat, IngestionSeverity, LoadOptions,
    ReconEvent, ReconObserver, load_from_path,
};
use marketplace_recon::schema::{Marketplace, SourceSchema};
use marketplace_recon::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl ReconObserver for RecordingObserver {
    fn on_event(&self, event: &ReconEvent<'_>) {
        self.events.lock().unwrap().push(event.to_string());
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(obs: Arc<RecordingObserver>, alert_at_or_above: IngestionSeverity) -> LoadOptions {
    LoadOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        format: Some(IngestionFormat::Csv),
        ..options_with(obs.clone(), IngestionSeverity::Critical)
    };

    // Missing file -> Io error -> Critical
    let _ = load_from_path("tests/fixtures/does_not_exist.csv", &SourceSchema::accurate(), &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn schema_resolution_failure_does_not_alert_at_critical_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    let err = load_from_path("tests/fixtures/unrelated.csv", &Marketplace::Shopee.schema(), &opts).unwrap_err();
    assert!(matches!(err, IngestionError::SchemaResolution { .. }));

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_threshold_alerts_on_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Error);

    let _ = load_from_path("tests/fixtures/unrelated.csv", &Marketplace::Lazada.schema(), &opts).unwrap_err();
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Error]);
}

#[test]
fn successful_load_reports_rows_and_invalid_samples() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    let out = load_from_path("tests/fixtures/shopee_orders.csv", &Marketplace::Shopee.schema(), &opts).unwrap();
    assert_eq!(out.records.len(), 5);

    let events = obs.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[0].contains("source=Shopee"));
    assert!(events[0].contains("valid=5"));
    assert!(events[0].contains("total=7"));
    assert!(events[0].contains("invoice='Order ID'"));
    assert!(events[1].contains("count=2"));
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn dropped_rows_are_events_not_failures_even_at_lowest_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Error);

    let out = load_from_path("tests/fixtures/shopee_orders.csv", &Marketplace::Shopee.schema(), &opts).unwrap();
    assert_eq!(out.metadata.invalid_rows, 2);

    let events = obs.events.lock().unwrap();
    assert!(events[1].starts_with("invalid_rows "));
    assert!(obs.failures.lock().unwrap().is_empty());
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn pipeline_emits_match_summary_last() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    let _ = reconcile_files(
        "tests/fixtures/shopee_orders.csv",
        "tests/fixtures/accurate_sales.csv",
        &Marketplace::Shopee.schema(),
        &opts,
    )
    .unwrap();

    let events = obs.events.lock().unwrap();
    let last = events.last().unwrap();
    assert!(last.contains("matched=2"));
    assert!(last.contains("amount_differences=1"));
    assert!(last.contains("source_only=2"));
    assert!(last.contains("accounting_only=1"));
}

#[test]
fn composite_observer_fans_out_and_file_observer_appends() {
    let log_path = std::env::temp_dir().join(format!(
        "marketplace-recon-observer-{}-{}.log",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let recorder = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn ReconObserver>> = vec![recorder.clone(), Arc::new(FileObserver::new(&log_path))];
    let composite = CompositeObserver::new(observers);
    let opts = LoadOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    let _ = load_from_path("tests/fixtures/missing.csv", &SourceSchema::accurate(), &opts).unwrap_err();

    assert_eq!(*recorder.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("missing.csv"));

    let _ = std::fs::remove_file(log_path);
}
