//! Invoice-level reconciliation of a marketplace export against the accounting export.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::ingestion::{ReconEvent, ReconObserver};
use crate::schema::ACCOUNTING_LABEL;
use crate::types::{Cell, RawRecord};

/// Absolute amount difference below which a pair counts as [`StatusKind::Match`].
pub const MATCH_TOLERANCE: f64 = 0.01;

/// An amount column in a result: a number, or the `-` placeholder when that side is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Value(f64),
    Missing,
}

impl Amount {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Missing => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Missing => f.write_str("-"),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Missing => serializer.serialize_str("-"),
        }
    }
}

/// Outcome of reconciling one invoice.
///
/// Declaration order is the output group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKind {
    /// Paired, but the amounts differ by at least [`MATCH_TOLERANCE`].
    AmountDifference,
    /// Paired with amounts within [`MATCH_TOLERANCE`].
    Match,
    /// Present only in the marketplace export (`<label> Only`).
    SourceOnly,
    /// Present only in the accounting export (`Accurate Only`).
    AccountingOnly,
}

impl StatusKind {
    pub const ALL: [StatusKind; 4] = [
        Self::AmountDifference,
        Self::Match,
        Self::SourceOnly,
        Self::AccountingOnly,
    ];

    /// Display label, e.g. `"Shopee Only"` for [`StatusKind::SourceOnly`].
    pub fn label(&self, source_label: &str) -> String {
        match self {
            Self::AmountDifference => "Amount Difference".to_string(),
            Self::Match => "Match".to_string(),
            Self::SourceOnly => format!("{source_label} Only"),
            Self::AccountingOnly => format!("{ACCOUNTING_LABEL} Only"),
        }
    }

    /// Inverse of [`StatusKind::label`].
    pub fn from_label(label: &str, source_label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label(source_label) == label)
    }
}

/// Raw rows behind a result, for drill-down displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace_row: Option<Vec<Cell>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accurate_row: Option<Vec<Cell>>,
}

/// One line of reconciliation output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub invoice_number: String,
    pub marketplace_amount: Amount,
    pub accurate_amount: Amount,
    /// `|marketplace - accurate|` for paired invoices.
    pub difference: Amount,
    pub status: StatusKind,
    pub marketplace_date: Option<String>,
    pub accurate_date: Option<String>,
    /// Marketplace label this run was reconciled for.
    pub marketplace: String,
    pub details: ResultDetails,
}

impl ResultRecord {
    /// Display label of [`Self::status`].
    pub fn status_label(&self) -> String {
        self.status.label(&self.marketplace)
    }

    fn paired(source: &RawRecord, accounting: &RawRecord, source_label: &str) -> Self {
        let difference = (source.amount - accounting.amount).abs();
        let status = if difference < MATCH_TOLERANCE {
            StatusKind::Match
        } else {
            StatusKind::AmountDifference
        };
        Self {
            invoice_number: source.invoice_number.clone(),
            marketplace_amount: Amount::Value(source.amount),
            accurate_amount: Amount::Value(accounting.amount),
            difference: Amount::Value(difference),
            status,
            marketplace_date: source.date.clone(),
            accurate_date: accounting.date.clone(),
            marketplace: source_label.to_string(),
            details: ResultDetails {
                marketplace_row: Some(source.raw_row.clone()),
                accurate_row: Some(accounting.raw_row.clone()),
            },
        }
    }

    fn source_only(source: &RawRecord, source_label: &str) -> Self {
        Self {
            invoice_number: source.invoice_number.clone(),
            marketplace_amount: Amount::Value(source.amount),
            accurate_amount: Amount::Missing,
            difference: Amount::Missing,
            status: StatusKind::SourceOnly,
            marketplace_date: source.date.clone(),
            accurate_date: None,
            marketplace: source_label.to_string(),
            details: ResultDetails {
                marketplace_row: Some(source.raw_row.clone()),
                accurate_row: None,
            },
        }
    }

    fn accounting_only(accounting: &RawRecord, source_label: &str) -> Self {
        Self {
            invoice_number: accounting.invoice_number.clone(),
            marketplace_amount: Amount::Missing,
            accurate_amount: Amount::Value(accounting.amount),
            difference: Amount::Missing,
            status: StatusKind::AccountingOnly,
            marketplace_date: None,
            accurate_date: accounting.date.clone(),
            marketplace: source_label.to_string(),
            details: ResultDetails {
                marketplace_row: None,
                accurate_row: Some(accounting.raw_row.clone()),
            },
        }
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResultRecord", 9)?;
        s.serialize_field("invoice_number", &self.invoice_number)?;
        s.serialize_field("marketplace_amount", &self.marketplace_amount)?;
        s.serialize_field("accurate_amount", &self.accurate_amount)?;
        s.serialize_field("difference", &self.difference)?;
        s.serialize_field("status", &self.status_label())?;
        s.serialize_field("marketplace_date", &self.marketplace_date)?;
        s.serialize_field("accurate_date", &self.accurate_date)?;
        s.serialize_field("marketplace", &self.marketplace)?;
        s.serialize_field("details", &self.details)?;
        s.end()
    }
}

/// Per-status counts of one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchCounts {
    pub source_records: usize,
    pub accounting_records: usize,
    pub matched: usize,
    pub amount_differences: usize,
    pub source_only: usize,
    pub accounting_only: usize,
}

/// Reconcile marketplace records against accounting records.
///
/// Each marketplace record, in order, is paired with the first accounting record carrying the
/// same invoice number, unless that invoice number has already been paired in this run. Once
/// an invoice number is consumed, later marketplace records with the same number become
/// `<label> Only`, and remaining accounting records with that number are not reported. Every
/// accounting invoice never consumed becomes `Accurate Only`.
///
/// Output order is fixed: all `Amount Difference`, then `Match`, then `<label> Only`, then
/// `Accurate Only`, each group in input order.
///
/// Pairing is first-come, not closest-amount; with duplicate invoice numbers the result
/// depends on input order.
pub fn reconcile(source: &[RawRecord], accounting: &[RawRecord], source_label: &str) -> Vec<ResultRecord> {
    reconcile_observed(source, accounting, source_label, None)
}

/// [`reconcile`], emitting a `match_summary` event to `observer` when done.
pub fn reconcile_observed(
    source: &[RawRecord],
    accounting: &[RawRecord],
    source_label: &str,
    observer: Option<&dyn ReconObserver>,
) -> Vec<ResultRecord> {
    // First accounting record per invoice number; later duplicates can never be paired.
    let mut first_by_invoice: HashMap<&str, &RawRecord> = HashMap::with_capacity(accounting.len());
    for rec in accounting {
        first_by_invoice.entry(rec.invoice_number.as_str()).or_insert(rec);
    }

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut amount_differences: Vec<ResultRecord> = Vec::new();
    let mut matches: Vec<ResultRecord> = Vec::new();
    let mut source_only: Vec<ResultRecord> = Vec::new();

    for src in source {
        let key = src.invoice_number.as_str();
        let pair = if consumed.contains(key) {
            None
        } else {
            first_by_invoice.get(key).copied()
        };

        match pair {
            Some(acc) => {
                consumed.insert(key);
                let result = ResultRecord::paired(src, acc, source_label);
                match result.status {
                    StatusKind::Match => matches.push(result),
                    _ => amount_differences.push(result),
                }
            }
            None => source_only.push(ResultRecord::source_only(src, source_label)),
        }
    }

    let accounting_only: Vec<ResultRecord> = accounting
        .iter()
        .filter(|rec| !consumed.contains(rec.invoice_number.as_str()))
        .map(|rec| ResultRecord::accounting_only(rec, source_label))
        .collect();

    let counts = MatchCounts {
        source_records: source.len(),
        accounting_records: accounting.len(),
        matched: matches.len(),
        amount_differences: amount_differences.len(),
        source_only: source_only.len(),
        accounting_only: accounting_only.len(),
    };
    if let Some(obs) = observer {
        obs.on_event(&ReconEvent::MatchSummary {
            source_label,
            counts: &counts,
        });
    }

    let mut out = amount_differences;
    out.reserve(matches.len() + source_only.len() + accounting_only.len());
    out.extend(matches);
    out.extend(source_only);
    out.extend(accounting_only);
    out
}
