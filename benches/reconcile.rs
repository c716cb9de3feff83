use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use marketplace_recon::ingestion::csv::read_csv_from_reader;
use marketplace_recon::ingestion::load_sheet;
use marketplace_recon::processing::{ReconSummary, reconcile};
use marketplace_recon::schema::Marketplace;
use marketplace_recon::types::RawRecord;

/// Roughly 80% shared invoices, some amount drift, a few duplicates.
fn records(n: usize) -> (Vec<RawRecord>, Vec<RawRecord>) {
    let source = (0..n)
        .map(|i| RawRecord::new(format!("INV-{:07}", i % (n - n / 20).max(1)), 100.0 + (i % 97) as f64))
        .collect();
    let accounting = (n / 5..n + n / 5)
        .map(|i| {
            let drift = if i % 13 == 0 { 2.5 } else { 0.0 };
            RawRecord::new(format!("INV-{i:07}"), 100.0 + (i % 97) as f64 + drift)
        })
        .collect();
    (source, accounting)
}

fn shopee_csv(n: usize) -> String {
    let mut out = String::from("Order ID,Order Status,Total Amount,Order Date\n");
    for i in 0..n {
        out.push_str(&format!("shp-{i:07},Completed,\"{},{:03}.50\",2024-03-{:02}\n", 1 + i % 900, i % 1000, 1 + i % 28));
    }
    out
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    for n in [1_000usize, 10_000, 100_000] {
        let (source, accounting) = records(n);
        group.throughput(Throughput::Elements((source.len() + accounting.len()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let results = reconcile(black_box(&source), black_box(&accounting), "Shopee");
                black_box(ReconSummary::from_results(&results))
            })
        });
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_csv");
    let schema = Marketplace::Shopee.schema();
    for n in [1_000usize, 50_000] {
        let text = shopee_csv(n);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &text, |b, text| {
            b.iter(|| {
                let sheet = read_csv_from_reader("bench.csv", text.as_bytes()).unwrap();
                black_box(load_sheet(sheet, &schema, 50, None).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_load);
criterion_main!(benches);
