//! Result filtering for display: by status and by a free-text search term.

use super::matcher::{ResultRecord, StatusKind};

/// Criteria for narrowing a reconciliation result list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFilter {
    /// Keep only this status; `None` keeps all.
    pub status: Option<StatusKind>,
    /// Case-insensitive substring of the invoice number, or a substring of either amount as
    /// displayed (`-` for an absent side). Empty matches everything.
    pub search: String,
}

impl ResultFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusKind) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether `record` passes this filter.
    pub fn matches(&self, record: &ResultRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        record.invoice_number.to_lowercase().contains(&needle)
            || record.marketplace_amount.to_string().contains(&self.search)
            || record.accurate_amount.to_string().contains(&self.search)
    }
}

/// Returns the records of `results` that pass `filter`, in their original order.
pub fn filter_results<'a>(results: &'a [ResultRecord], filter: &ResultFilter) -> Vec<&'a ResultRecord> {
    results.iter().filter(|r| filter.matches(r)).collect()
}
