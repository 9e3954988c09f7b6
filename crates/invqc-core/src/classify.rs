//! Outcome classification: merge rule findings into one verdict.

use crate::error::IndexError;
use crate::models::record::InvoiceRecord;
use crate::models::report::{ValidationVerdict, VerdictStatus};
use crate::rules::{ConsistencyFindings, FieldFindings};

/// Error message attached to a DUPLICATE verdict.
pub const DUPLICATE_MESSAGE: &str =
    "Duplicate invoice: same Vendor Tax ID + Invoice Number + Fiscal Year already processed";

/// Result of the duplicate-detection step for one record.
#[derive(Debug, Clone)]
pub enum DuplicateOutcome {
    /// Well-formed key, first sighting.
    Unique,
    /// Key components missing; the record is exempt from detection.
    NotCheckable,
    /// Key already present in the index.
    Duplicate,
    /// The index could not answer; detection was skipped, not passed.
    Unavailable(IndexError),
}

/// Merge all findings into a verdict.
///
/// Precedence, highest first: DUPLICATE, REJECTED, MANUAL_REVIEW,
/// WARNING, APPROVED. A duplicate halts message accumulation for the
/// record: its verdict carries the duplicate error and nothing else.
/// Every other tier accumulates the full message list so consumers see
/// all issues, not only the classifying one.
pub fn classify(
    record: InvoiceRecord,
    fields: FieldFindings,
    consistency: ConsistencyFindings,
    duplicate: DuplicateOutcome,
) -> ValidationVerdict {
    if let DuplicateOutcome::Duplicate = duplicate {
        return ValidationVerdict::new(
            record,
            VerdictStatus::Duplicate,
            vec![DUPLICATE_MESSAGE.to_string()],
            Vec::new(),
        );
    }

    let errors = fields.errors;
    let mut warnings = fields.warnings;
    warnings.extend(consistency.warnings);

    // Manual-review triggers each contribute a warning, listed alongside
    // the ordinary ones regardless of the final tier.
    let mut needs_review = false;
    if fields.vendor_unidentified {
        needs_review = true;
        warnings.push(
            "Vendor identification insufficient: both Tax ID and address are missing".to_string(),
        );
    }
    if fields.line_items_missing {
        needs_review = true;
        warnings.push("Total Amount Due is positive but no line items were captured".to_string());
    }
    if let DuplicateOutcome::Unavailable(err) = &duplicate {
        needs_review = true;
        warnings.push(format!("Duplicate check skipped: {}", err));
    }

    let status = if !errors.is_empty() {
        VerdictStatus::Rejected
    } else if needs_review {
        VerdictStatus::ManualReview
    } else if !warnings.is_empty() {
        VerdictStatus::Warning
    } else {
        VerdictStatus::Approved
    };

    ValidationVerdict::new(record, status, errors, warnings)
}
