//! Aggregate figures over a reconciliation result list.

use serde::Serialize;

use super::matcher::{ResultRecord, StatusKind};

/// Totals shown above a reconciliation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    /// Number of result lines.
    pub total: usize,
    pub matched: usize,
    pub amount_differences: usize,
    pub source_only: usize,
    pub accounting_only: usize,
    /// `matched / total` as a percentage rounded to one decimal; `0.0` for no results.
    pub match_rate: f64,
    /// Sum of `difference` over all paired lines.
    pub total_difference: f64,
    /// Sum of `difference` over `Amount Difference` lines only.
    pub total_mismatch: f64,
    /// Sum of every present marketplace amount.
    pub total_source_amount: f64,
    /// Sum of every present accounting amount.
    pub total_accounting_amount: f64,
    /// `total_source_amount - total_accounting_amount`.
    pub net_difference: f64,
}

impl ReconSummary {
    pub fn from_results(results: &[ResultRecord]) -> Self {
        let mut s = Self {
            total: results.len(),
            ..Self::default()
        };

        for r in results {
            match r.status {
                StatusKind::Match => s.matched += 1,
                StatusKind::AmountDifference => {
                    s.amount_differences += 1;
                    s.total_mismatch += r.difference.value().unwrap_or(0.0);
                }
                StatusKind::SourceOnly => s.source_only += 1,
                StatusKind::AccountingOnly => s.accounting_only += 1,
            }
            s.total_difference += r.difference.value().unwrap_or(0.0);
            s.total_source_amount += r.marketplace_amount.value().unwrap_or(0.0);
            s.total_accounting_amount += r.accurate_amount.value().unwrap_or(0.0);
        }

        if s.total > 0 {
            let pct = s.matched as f64 / s.total as f64 * 100.0;
            s.match_rate = (pct * 10.0).round() / 10.0;
        }
        s.net_difference = s.total_source_amount - s.total_accounting_amount;
        s
    }

    /// Count for one status group.
    pub fn count(&self, kind: StatusKind) -> usize {
        match kind {
            StatusKind::AmountDifference => self.amount_differences,
            StatusKind::Match => self.matched,
            StatusKind::SourceOnly => self.source_only,
            StatusKind::AccountingOnly => self.accounting_only,
        }
    }
}
