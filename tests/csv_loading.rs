use marketplace_recon::ingestion::csv::{read_csv_from_path, read_csv_from_reader};
use marketplace_recon::ingestion::{DEFAULT_INVALID_SAMPLE_LIMIT, load_sheet};
use marketplace_recon::schema::{Marketplace, SourceSchema};
use marketplace_recon::types::{Cell, IngestionMetadata, InvalidReason};
use marketplace_recon::IngestionError;

#[test]
fn read_csv_from_path_keeps_every_row() {
    let sheet = read_csv_from_path("tests/fixtures/shopee_orders.csv").unwrap();

    assert_eq!(sheet.file_name, "shopee_orders.csv");
    assert_eq!(sheet.sheet_count, 1);
    assert_eq!(sheet.rows.len(), 8);
    assert_eq!(
        sheet.header().unwrap(),
        &[
            Cell::text("Order ID"),
            Cell::text("Order Status"),
            Cell::text("Total Amount"),
            Cell::text("Order Date"),
        ]
    );
    assert_eq!(sheet.data_rows()[0][2], Cell::text("150,000.00"));
}

#[test]
fn shopee_export_loads_with_mixed_number_styles() {
    let sheet = read_csv_from_path("tests/fixtures/shopee_orders.csv").unwrap();
    let out = load_sheet(sheet, &Marketplace::Shopee.schema(), DEFAULT_INVALID_SAMPLE_LIMIT, None).unwrap();

    let got: Vec<(&str, f64, Option<&str>)> = out
        .records
        .iter()
        .map(|r| (r.invoice_number.as_str(), r.amount, r.date.as_deref()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("SHP-1001", 150_000.0, Some("2024-03-01")),
            ("SHP-1002", 75.5, Some("2024-03-02")),
            ("SHP-1003", 200_000.0, Some("2024-03-05")),
            ("SHP-1002", 10.0, Some("2024-03-08")),
            ("SHP-1005", 12_500.0, Some("2024-03-09")),
        ]
    );

    assert_eq!(
        out.metadata,
        IngestionMetadata {
            file_name: "shopee_orders.csv".to_string(),
            sheet_count: 1,
            total_rows: 7,
            valid_rows: 5,
            invalid_rows: 2,
        }
    );
    assert_eq!(
        out.invalid_samples
            .iter()
            .map(|r| (r.row_number, r.reason))
            .collect::<Vec<_>>(),
        vec![(5, InvalidReason::NonPositiveAmount), (6, InvalidReason::EmptyInvoice)]
    );
}

#[test]
fn column_mapping_reports_chosen_headers() {
    let sheet = read_csv_from_path("tests/fixtures/shopee_orders.csv").unwrap();
    let out = load_sheet(sheet, &Marketplace::Shopee.schema(), 50, None).unwrap();

    assert_eq!(out.mapping.invoice, "Order ID");
    assert_eq!(out.mapping.amount, "Total Amount");
    assert_eq!(out.mapping.date.as_deref(), Some("Order Date"));
    assert_eq!(
        out.mapping.to_string(),
        "invoice='Order ID' amount='Total Amount' date='Order Date'"
    );
}

#[test]
fn accounting_export_uses_accurate_vocabulary() {
    let sheet = read_csv_from_path("tests/fixtures/accurate_sales.csv").unwrap();
    let out = load_sheet(sheet, &SourceSchema::accurate(), 50, None).unwrap();

    assert_eq!(out.source_label, "Accurate");
    assert_eq!(out.records.len(), 5);
    assert_eq!(out.mapping.invoice, "Faktur");
    assert_eq!(out.mapping.amount, "Total");
    assert_eq!(out.mapping.date.as_deref(), Some("Tanggal"));
    assert!(out.invalid_samples.is_empty());
}

#[test]
fn leftmost_matching_header_wins_over_candidate_order() {
    // "No" is a weaker accounting candidate than "Faktur", but it sits further left.
    let input = "No,Faktur,Total\n1,INV-9,100\n";
    let sheet = read_csv_from_reader("acc.csv", input.as_bytes()).unwrap();
    let out = load_sheet(sheet, &SourceSchema::accurate(), 50, None).unwrap();

    assert_eq!(out.mapping.invoice, "No");
    assert_eq!(out.records[0].invoice_number, "1");
}

#[test]
fn unrelated_file_fails_schema_resolution() {
    let sheet = read_csv_from_path("tests/fixtures/unrelated.csv").unwrap();
    let err = load_sheet(sheet, &Marketplace::TikTok.schema(), 50, None).unwrap_err();

    match err {
        IngestionError::SchemaResolution {
            source_label,
            invoice_field,
            amount_field,
            headers,
        } => {
            assert_eq!(source_label, "TikTok");
            assert_eq!(invoice_field, "Order Number");
            assert_eq!(amount_field, "Amount");
            assert_eq!(headers, vec!["Buyer".to_string(), "Note".to_string()]);
        }
        other => panic!("expected SchemaResolution, got {other:?}"),
    }
}

#[test]
fn empty_csv_is_a_structure_error() {
    let sheet = read_csv_from_reader("empty.csv", "".as_bytes()).unwrap();
    assert!(sheet.rows.is_empty());

    let err = load_sheet(sheet, &Marketplace::Lazada.schema(), 50, None).unwrap_err();
    assert!(matches!(err, IngestionError::FileStructure { ref source_label } if source_label == "Lazada"));
}
