//! Reconciliation over loaded records.
//!
//! The processing layer operates on [`crate::types::RawRecord`] values produced by ingestion.
//! It is purely in-memory.
//!
//! Currently implemented:
//!
//! - [`reconcile()`]: pair marketplace records with accounting records by invoice number
//! - [`ReconSummary`]: counts, match rate and amount totals over a result list
//! - [`filter_results()`]: narrow a result list by status and search term
//!
//! ## Example: reconcile → summarize → filter
//!
//! ```rust
//! use marketplace_recon::processing::{filter_results, reconcile, ReconSummary, ResultFilter, StatusKind};
//! use marketplace_recon::types::RawRecord;
//!
//! let shopee = vec![RawRecord::new("INV-1", 100.0), RawRecord::new("INV-2", 50.0)];
//! let accurate = vec![RawRecord::new("INV-1", 100.0), RawRecord::new("INV-3", 20.0)];
//!
//! let results = reconcile(&shopee, &accurate, "Shopee");
//! assert_eq!(results[0].status, StatusKind::Match);
//! assert_eq!(results[1].status_label(), "Shopee Only");
//! assert_eq!(results[2].status_label(), "Accurate Only");
//!
//! let summary = ReconSummary::from_results(&results);
//! assert_eq!(summary.matched, 1);
//! assert_eq!(summary.match_rate, 33.3);
//!
//! let only = filter_results(&results, &ResultFilter::new().with_search("inv-3"));
//! assert_eq!(only.len(), 1);
//! ```

pub mod filter;
pub mod matcher;
pub mod summary;

pub use filter::{ResultFilter, filter_results};
pub use matcher::{
    Amount, MATCH_TOLERANCE, MatchCounts, ResultDetails, ResultRecord, StatusKind, reconcile,
    reconcile_observed,
};
pub use summary::ReconSummary;
