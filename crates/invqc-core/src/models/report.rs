//! Verdict and batch report models - the engine's output.

use serde::{Deserialize, Serialize};

use super::record::InvoiceRecord;

/// Terminal status of one validated record.
///
/// Ordered by classification precedence: a record is assigned the
/// highest-precedence status whose condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    /// No findings at all.
    Approved,
    /// Only warning-tier findings.
    Warning,
    /// Cannot be auto-approved or auto-rejected; needs a human.
    ManualReview,
    /// A mandatory field is missing or the input was malformed.
    Rejected,
    /// Same (vendor tax id, invoice number, fiscal year) already seen.
    Duplicate,
}

impl VerdictStatus {
    /// Severity rank for presentation-layer sorting (higher = worse).
    /// The engine itself never reorders report details.
    pub fn severity(self) -> u8 {
        match self {
            VerdictStatus::Approved => 0,
            VerdictStatus::Warning => 1,
            VerdictStatus::ManualReview => 2,
            VerdictStatus::Rejected => 3,
            VerdictStatus::Duplicate => 4,
        }
    }

    /// Display label, matching the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            VerdictStatus::Approved => "APPROVED",
            VerdictStatus::Warning => "WARNING",
            VerdictStatus::ManualReview => "MANUAL_REVIEW",
            VerdictStatus::Rejected => "REJECTED",
            VerdictStatus::Duplicate => "DUPLICATE",
        }
    }
}

/// The engine's decision for one invoice record.
///
/// Invariant: `errors` is non-empty exactly when `status` is
/// [`VerdictStatus::Rejected`] or [`VerdictStatus::Duplicate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// Invoice number copied from the record (empty string if missing).
    pub invoice_number: String,

    /// The source record, preserved for display.
    pub original_data: InvoiceRecord,

    /// Terminal status.
    pub status: VerdictStatus,

    /// Error-tier findings, in rule-evaluation order.
    pub errors: Vec<String>,

    /// Warning-tier findings, in rule-evaluation order.
    pub warnings: Vec<String>,

    /// Whether the record passed (status APPROVED or WARNING).
    pub is_valid: bool,
}

impl ValidationVerdict {
    /// Build a verdict, deriving `invoice_number` and `is_valid`.
    pub fn new(
        record: InvoiceRecord,
        status: VerdictStatus,
        errors: Vec<String>,
        warnings: Vec<String>,
    ) -> Self {
        let invoice_number = record.invoice_number().unwrap_or_default().to_string();
        let is_valid = matches!(status, VerdictStatus::Approved | VerdictStatus::Warning);
        Self {
            invoice_number,
            original_data: record,
            status,
            errors,
            warnings,
            is_valid,
        }
    }
}

/// Per-status tallies over one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub approved: usize,
    pub warning: usize,
    pub manual_review: usize,
    pub rejected: usize,
    pub duplicate: usize,
}

impl BatchSummary {
    fn tally(&mut self, status: VerdictStatus) {
        self.total += 1;
        match status {
            VerdictStatus::Approved => self.approved += 1,
            VerdictStatus::Warning => self.warning += 1,
            VerdictStatus::ManualReview => self.manual_review += 1,
            VerdictStatus::Rejected => self.rejected += 1,
            VerdictStatus::Duplicate => self.duplicate += 1,
        }
    }
}

/// Full result of validating a batch: summary counts plus one verdict
/// per input record, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub details: Vec<ValidationVerdict>,
}

impl BatchReport {
    /// Assemble a report from verdicts, preserving their order.
    pub fn from_verdicts(details: Vec<ValidationVerdict>) -> Self {
        let mut summary = BatchSummary::default();
        for verdict in &details {
            summary.tally(verdict.status);
        }
        Self { summary, details }
    }
}
