//! Field-presence rules: completeness, vendor identification, line items.

use rust_decimal::Decimal;

use crate::models::record::{present, InvoiceRecord};

/// Findings from the field-presence rules.
#[derive(Debug, Clone, Default)]
pub struct FieldFindings {
    /// Error-tier findings (mandatory fields).
    pub errors: Vec<String>,
    /// Warning-tier findings (optional fields).
    pub warnings: Vec<String>,
    /// Neither tax id nor address identifies the vendor.
    pub vendor_unidentified: bool,
    /// A positive total with no line items captured.
    pub line_items_missing: bool,
}

/// Evaluate every field rule over one record. All rules are checked
/// independently; nothing short-circuits. Pure function of the record.
pub fn check(record: &InvoiceRecord) -> FieldFindings {
    let mut findings = FieldFindings::default();

    if record.invoice_number().is_none() {
        findings.errors.push("Invoice Number is missing".to_string());
    }
    if record.total_amount_due.is_none() {
        findings.errors.push("Total Amount Due is missing".to_string());
    }

    if record.invoice_date.is_none() {
        findings.warnings.push("Invoice Date is missing".to_string());
    }
    if present(&record.vendor_name).is_none() {
        findings.warnings.push("Vendor Name is missing".to_string());
    }

    // Vendor must be identifiable by at least one of tax id / address.
    if record.vendor_tax_id().is_none() && present(&record.vendor_address).is_none() {
        findings.vendor_unidentified = true;
    }

    // A positive amount due with no line items cannot be auto-verified.
    if record.line_items.is_empty()
        && record
            .total_amount_due
            .is_some_and(|due| due > Decimal::ZERO)
    {
        findings.line_items_missing = true;
    }

    findings
}
