//! Source schema descriptors.
//!
//! A [`SourceSchema`] tells the loader which header spellings identify the invoice, amount and
//! date columns of one upstream export. Built-in descriptors cover the accounting system and
//! the supported marketplaces; additional marketplaces can be described in JSON:
//!
//! ```rust
//! use marketplace_recon::schema::SourceSchema;
//!
//! # fn main() -> Result<(), marketplace_recon::IngestionError> {
//! let schema = SourceSchema::from_json_str(r#"{
//!     "source_label": "Blibli",
//!     "invoice_field": "Order No",
//!     "amount_field": "Total",
//!     "invoice_candidates": ["orderno", "orderid"],
//!     "amount_candidates": ["total", "amount"],
//!     "date_candidates": ["orderdate"]
//! }"#)?;
//! assert_eq!(schema.source_label, "Blibli");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IngestionResult;

/// Label of the accounting side; also used in the `Accurate Only` status.
pub const ACCOUNTING_LABEL: &str = "Accurate";

/// Column vocabulary for one upstream export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSchema {
    /// Display label, e.g. `"Shopee"`. Used in `<label> Only` statuses and error messages.
    pub source_label: String,
    /// Human name of the invoice field, used in error messages.
    pub invoice_field: String,
    /// Human name of the amount field, used in error messages.
    pub amount_field: String,
    /// Acceptable invoice header spellings.
    pub invoice_candidates: Vec<String>,
    /// Acceptable amount header spellings.
    pub amount_candidates: Vec<String>,
    /// Acceptable date header spellings. The date column is optional.
    #[serde(default)]
    pub date_candidates: Vec<String>,
}

impl SourceSchema {
    /// Create a schema descriptor.
    pub fn new(
        source_label: impl Into<String>,
        invoice_field: impl Into<String>,
        amount_field: impl Into<String>,
        invoice_candidates: &[&str],
        amount_candidates: &[&str],
        date_candidates: &[&str],
    ) -> Self {
        let owned = |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        Self {
            source_label: source_label.into(),
            invoice_field: invoice_field.into(),
            amount_field: amount_field.into(),
            invoice_candidates: owned(invoice_candidates),
            amount_candidates: owned(amount_candidates),
            date_candidates: owned(date_candidates),
        }
    }

    /// The accounting-system export.
    pub fn accurate() -> Self {
        Self::new(
            ACCOUNTING_LABEL,
            "Invoice",
            "Amount",
            &["faktur", "invoice", "invoiceno", "no", "number"],
            &["total", "amount", "jumlah", "grandtotal", "price"],
            &["tanggal", "date", "tgl", "createddate", "created"],
        )
    }

    /// Parse a descriptor from JSON.
    pub fn from_json_str(input: &str) -> IngestionResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read a descriptor from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Built-in marketplace exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    Shopee,
    TikTok,
    Lazada,
}

impl Marketplace {
    pub const ALL: [Marketplace; 3] = [Self::Shopee, Self::TikTok, Self::Lazada];

    /// Stable lowercase key (`"shopee"`, `"tiktok"`, `"lazada"`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Shopee => "shopee",
            Self::TikTok => "tiktok",
            Self::Lazada => "lazada",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Shopee => "Shopee",
            Self::TikTok => "TikTok",
            Self::Lazada => "Lazada",
        }
    }

    /// Look up a marketplace by key (case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Column vocabulary for this marketplace's order export.
    pub fn schema(&self) -> SourceSchema {
        match self {
            Self::Shopee => SourceSchema::new(
                self.label(),
                "Order ID",
                "Total Amount",
                &["orderid", "ordernumber", "order", "transactionid", "id"],
                &["totalamount", "amount", "total", "price", "orderamount"],
                &["completedtime", "date", "orderdate", "createdate", "tgl"],
            ),
            Self::TikTok => SourceSchema::new(
                self.label(),
                "Order Number",
                "Amount",
                &["ordernumber", "orderid", "order", "transactionid", "id", "orderno"],
                &[
                    "buyerpaidamount",
                    "amount",
                    "totalamount",
                    "total",
                    "price",
                    "paymentamount",
                ],
                &["orderdate", "paiddate", "date", "createddate", "tgl", "time"],
            ),
            Self::Lazada => SourceSchema::new(
                self.label(),
                "Transaction Number",
                "Amount",
                &[
                    "transactionnumber",
                    "transaction",
                    "id",
                    "orderid",
                    "ordernumber",
                    "transactionid",
                ],
                &["amount", "total", "totalamount", "price", "orderamount", "totalvalue"],
                &["createdtime", "created", "date", "orderdate", "tgl"],
            ),
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
