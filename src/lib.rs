//! `marketplace-recon` reconciles invoice-level sales data between a marketplace order export
//! (Shopee, TikTok, Lazada, or any marketplace described by a [`schema::SourceSchema`]) and an
//! accounting export (Accurate), reporting per-invoice matches, amount differences, and records
//! present on only one side.
//!
//! The primary entrypoint is [`execution::reconcile_files`], which loads both exports, reconciles
//! them, and summarizes the result. Each stage is also usable on its own.
//!
//! ## What you can load
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **Excel/workbooks** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`,
//!   `.xlsm`, `.xlsb`, `.ods`
//!
//! Only the first sheet is read; its first row is the header row. Header names are matched
//! loosely: case, spaces and punctuation are ignored, so `"Order ID"`, `"order_id"` and
//! `"ORDER-ID"` all resolve to the candidate `orderid`.
//!
//! **Cell values:**
//!
//! - amounts accept currency symbols and both `1,234.56` and `1.234,56` styles
//! - dates accept spreadsheet day serials and common text formats, and are reported as
//!   `YYYY-MM-DD`
//! - invoice numbers are trimmed and uppercased
//!
//! Rows with an empty invoice number or a non-positive amount are dropped and counted in
//! [`types::IngestionMetadata::invalid_rows`].
//!
//! ## Quick example: reconcile two files
//!
//! ```no_run
//! use marketplace_recon::execution::reconcile_files;
//! use marketplace_recon::ingestion::LoadOptions;
//! use marketplace_recon::schema::Marketplace;
//!
//! # fn main() -> Result<(), marketplace_recon::IngestionError> {
//! let out = reconcile_files(
//!     "shopee.xlsx",
//!     "accurate.xlsx",
//!     &Marketplace::Shopee.schema(),
//!     &LoadOptions::default(),
//! )?;
//! for r in &out.results {
//!     println!("{} {} {}", r.invoice_number, r.status_label(), r.difference);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`normalize`]: header, invoice, amount and date normalization
//! - [`resolver`]: header-to-column resolution
//! - [`schema`]: per-source column vocabularies
//! - [`ingestion`]: file readers, the schema-driven loader, and observer hooks
//! - [`processing`]: reconciliation, summary and result filtering
//! - [`execution`]: end-to-end pipeline and parallel batches
//! - [`types`]: cell, record and metadata types
//! - [`error`]: error types used across loading
//!
//! ## Reconciliation example (in memory)
//!
//! ```rust
//! use marketplace_recon::processing::{reconcile, Amount, StatusKind};
//! use marketplace_recon::types::RawRecord;
//!
//! let lazada = vec![RawRecord::new("TRX-1", 120.0), RawRecord::new("TRX-1", 80.0)];
//! let accurate = vec![RawRecord::new("TRX-1", 100.0)];
//!
//! let results = reconcile(&lazada, &accurate, "Lazada");
//! assert_eq!(results[0].status, StatusKind::AmountDifference);
//! assert_eq!(results[0].difference, Amount::Value(20.0));
//! // The invoice is consumed by the first pairing.
//! assert_eq!(results[1].status_label(), "Lazada Only");
//! ```
//!
//! ### Status groups
//!
//! Results are always ordered `Amount Difference`, `Match`, `<marketplace> Only`,
//! `Accurate Only`. Two amounts match when they differ by less than
//! [`processing::MATCH_TOLERANCE`].

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod normalize;
pub mod processing;
pub mod resolver;
pub mod schema;
pub mod types;

pub use error::{IngestionError, IngestionResult};
