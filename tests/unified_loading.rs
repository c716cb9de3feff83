use marketplace_recon::ingestion::{
    IngestionFormat, LoadOptions, load_from_bytes, load_from_path, read_sheet_from_path,
};
use marketplace_recon::schema::{Marketplace, SourceSchema};
use marketplace_recon::types::InvalidReason;
use marketplace_recon::IngestionError;

#[test]
fn csv_is_inferred_from_extension() {
    let out = load_from_path(
        "tests/fixtures/accurate_sales.csv",
        &SourceSchema::accurate(),
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(out.metadata.valid_rows, 5);
}

#[test]
fn forced_format_overrides_extension() {
    let path = std::env::temp_dir().join(format!("marketplace-recon-forced-{}.txt", std::process::id()));
    std::fs::write(&path, "Order ID,Amount\nA-1,10\n").unwrap();

    let err = load_from_path(&path, &Marketplace::Shopee.schema(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::UnsupportedFormat { .. }));

    let opts = LoadOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    };
    let out = load_from_path(&path, &Marketplace::Shopee.schema(), &opts).unwrap();
    assert_eq!(out.records[0].invoice_number, "A-1");

    let _ = std::fs::remove_file(path);
}

#[test]
fn bytes_and_path_loading_agree_for_csv() {
    let bytes = std::fs::read("tests/fixtures/shopee_orders.csv").unwrap();
    let from_bytes = load_from_bytes(
        "shopee_orders.csv",
        bytes,
        &Marketplace::Shopee.schema(),
        &LoadOptions::default(),
    )
    .unwrap();
    let from_path = load_from_path(
        "tests/fixtures/shopee_orders.csv",
        &Marketplace::Shopee.schema(),
        &LoadOptions::default(),
    )
    .unwrap();

    assert_eq!(from_bytes.records, from_path.records);
    assert_eq!(from_bytes.metadata, from_path.metadata);
    assert_eq!(from_bytes.invalid_samples, from_path.invalid_samples);
}

#[test]
fn invalid_sample_limit_is_configurable() {
    let opts = LoadOptions {
        invalid_sample_limit: 1,
        ..Default::default()
    };
    let out = load_from_path("tests/fixtures/shopee_orders.csv", &Marketplace::Shopee.schema(), &opts).unwrap();
    assert_eq!(out.metadata.invalid_rows, 2);
    assert_eq!(out.invalid_samples.len(), 1);
}

#[test]
fn blank_csv_line_counts_as_an_invalid_row() {
    let csv = b"Order ID,Total Amount\nA-1,10\n,\nA-2,20\n".to_vec();
    let out = load_from_bytes("s.csv", csv, &Marketplace::Shopee.schema(), &LoadOptions::default()).unwrap();

    assert_eq!(out.metadata.total_rows, 3);
    assert_eq!(out.metadata.valid_rows, 2);
    assert_eq!(out.metadata.invalid_rows, 1);
    assert_eq!(out.invalid_samples[0].row_number, 3);
    assert_eq!(out.invalid_samples[0].reason, InvalidReason::EmptyInvoice);
}

#[test]
fn raw_sheet_is_available_without_a_schema() {
    let sheet = read_sheet_from_path("tests/fixtures/unrelated.csv", IngestionFormat::Csv).unwrap();
    assert_eq!(sheet.rows.len(), 2);
}

#[test]
fn custom_marketplace_from_json_config() {
    let schema = SourceSchema::from_json_str(
        r#"{
            "source_label": "Tokopedia",
            "invoice_field": "Nomor Invoice",
            "amount_field": "Total Pembayaran",
            "invoice_candidates": ["nomorinvoice", "invoice"],
            "amount_candidates": ["totalpembayaran", "total"]
        }"#,
    )
    .unwrap();
    assert!(schema.date_candidates.is_empty());

    let csv = b"Nomor Invoice,Total Pembayaran\ninv/2024/001,\"Rp99.000\"\nINV/2024/002,99000\n".to_vec();
    let out = load_from_bytes("tokopedia.csv", csv, &schema, &LoadOptions::default()).unwrap();

    assert_eq!(out.source_label, "Tokopedia");
    // "Rp" is not a stripped currency marker, so the first amount does not parse.
    assert_eq!(out.metadata.invalid_rows, 1);
    assert_eq!(out.records[0].invoice_number, "INV/2024/002");
    assert_eq!(out.mapping.date, None);
}

#[cfg(not(feature = "excel"))]
#[test]
fn excel_without_feature_is_unsupported() {
    let err = load_from_path("whatever.xlsx", &SourceSchema::accurate(), &LoadOptions::default()).unwrap_err();
    assert!(err.to_string().contains("excel"));
}
