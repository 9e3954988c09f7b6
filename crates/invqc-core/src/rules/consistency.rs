//! Consistency rules: arithmetic reconciliation and date validity.

use chrono::{DateTime, Utc};

use crate::models::config::QcConfig;
use crate::models::record::InvoiceRecord;

/// Findings from the consistency rules. Everything here is
/// warning-tier: suspicious but possibly legitimate data that a human
/// should review rather than data that blocks processing.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyFindings {
    pub warnings: Vec<String>,
}

/// Evaluate arithmetic and date rules over one record.
///
/// `now` is the validation timestamp, injected by the caller so runs
/// are deterministic and testable. Pure function of its arguments.
pub fn check(record: &InvoiceRecord, now: DateTime<Utc>, config: &QcConfig) -> ConsistencyFindings {
    let mut findings = ConsistencyFindings::default();

    // Reconciliation only runs when all three operands are present;
    // completeness of individual amounts is the field rules' concern.
    if let (Some(net), Some(tax), Some(due)) = (
        record.total_net_amount,
        record.total_tax_amount,
        record.total_amount_due,
    ) {
        let expected = net + tax;
        // Deviation exactly at the tolerance is accepted.
        if (expected - due).abs() > config.amount_tolerance {
            findings.warnings.push(format!(
                "Net + Tax does not equal Total Amount Due (expected {}, got {})",
                expected, due
            ));
        }
    }

    if let Some(invoice_date) = record.invoice_date {
        let today = now.date_naive();
        // Independent conditions; both may fire on contrived input.
        if invoice_date > today {
            findings
                .warnings
                .push("Invoice date is in the future".to_string());
        }
        if (today - invoice_date).num_days() > config.max_invoice_age_days {
            findings.warnings.push(format!(
                "Invoice date is older than {} days",
                config.max_invoice_age_days
            ));
        }
    }

    findings
}
