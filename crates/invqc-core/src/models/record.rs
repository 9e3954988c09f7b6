//! Invoice record model - the engine's canonical input.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One extracted invoice, as handed over by the extraction/ingestion layer.
///
/// Every field is optional: extraction may fail to capture any of them,
/// and completeness is judged by the QC rules, not by the type system.
/// The engine never mutates a record; it only produces a separate verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number/identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Date the invoice was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Vendor (seller) legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,

    /// Vendor tax identification number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_tax_id: Option<String>,

    /// Vendor address as a single string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_address: Option<String>,

    /// Buyer legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,

    /// Purchase order reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,

    /// ISO 4217 currency code (3 letters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Total net amount (before tax).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_net_amount: Option<Decimal>,

    /// Total tax amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tax_amount: Option<Decimal>,

    /// Total amount due (gross).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount_due: Option<Decimal>,

    /// Fiscal year the invoice is attributed to. Derived from
    /// `invoice_date` when not supplied explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<i32>,

    /// Line items, in invoice order. May be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
}

/// A single line item. The QC rules only care about presence, so the
/// shape is deliberately loose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,

    /// Unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    /// Total for this line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_total: Option<Decimal>,
}

/// Trimmed, non-empty view of an optional string field.
///
/// Extraction frequently yields empty or whitespace-only strings for
/// fields it could not read; those count as missing everywhere.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl InvoiceRecord {
    /// Fiscal year, falling back to the invoice date's calendar year.
    pub fn effective_fiscal_year(&self) -> Option<i32> {
        self.fiscal_year
            .or_else(|| self.invoice_date.map(|d| d.year()))
    }

    /// Invoice number with whitespace-only values treated as missing.
    pub fn invoice_number(&self) -> Option<&str> {
        present(&self.invoice_number)
    }

    /// Vendor tax id with whitespace-only values treated as missing.
    pub fn vendor_tax_id(&self) -> Option<&str> {
        present(&self.vendor_tax_id)
    }
}
