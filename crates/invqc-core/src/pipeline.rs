//! The validation pipeline: rules, duplicate check, classification,
//! batch report assembly.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::classify::{classify, DuplicateOutcome};
use crate::dedupe::{DuplicateIndex, DuplicateKey, KeyDisposition};
use crate::error::QcError;
use crate::ingest::{self, ParsedRecord};
use crate::models::config::QcConfig;
use crate::models::record::InvoiceRecord;
use crate::models::report::{BatchReport, ValidationVerdict, VerdictStatus};
use crate::rules;

/// Validate one record: field rules, consistency rules, duplicate
/// check, classification. The duplicate check runs for every record
/// with a well-formed key, so even a rejected record claims its key.
pub fn validate_record(
    record: InvoiceRecord,
    now: DateTime<Utc>,
    config: &QcConfig,
    index: &dyn DuplicateIndex,
) -> ValidationVerdict {
    validate_with_seed(record, Vec::new(), now, config, index)
}

fn validate_with_seed(
    record: InvoiceRecord,
    seed_warnings: Vec<String>,
    now: DateTime<Utc>,
    config: &QcConfig,
    index: &dyn DuplicateIndex,
) -> ValidationVerdict {
    let mut fields = rules::check_fields(&record);
    if !seed_warnings.is_empty() {
        let mut warnings = seed_warnings;
        warnings.append(&mut fields.warnings);
        fields.warnings = warnings;
    }
    let consistency = rules::check_consistency(&record, now, config);

    let duplicate = match DuplicateKey::for_record(&record) {
        None => DuplicateOutcome::NotCheckable,
        Some(key) => match index.check_and_insert(&key, now) {
            Ok(KeyDisposition::New) => DuplicateOutcome::Unique,
            Ok(KeyDisposition::Seen) => DuplicateOutcome::Duplicate,
            Err(err) => DuplicateOutcome::Unavailable(err),
        },
    };

    let verdict = classify(record, fields, consistency, duplicate);
    debug!(
        invoice = %verdict.invoice_number,
        status = verdict.status.label(),
        errors = verdict.errors.len(),
        warnings = verdict.warnings.len(),
        "validated record"
    );
    verdict
}

/// Validate one leniently parsed record. A malformed record is
/// rejected with its malformation errors and skips the rule pipeline;
/// parse warnings of a well-formed record join its rule warnings.
pub fn validate_parsed(
    parsed: ParsedRecord,
    now: DateTime<Utc>,
    config: &QcConfig,
    index: &dyn DuplicateIndex,
) -> ValidationVerdict {
    if parsed.is_malformed() {
        debug!(errors = parsed.errors.len(), "rejecting malformed record");
        return ValidationVerdict::new(
            parsed.record,
            VerdictStatus::Rejected,
            parsed.errors,
            parsed.warnings,
        );
    }
    validate_with_seed(parsed.record, parsed.warnings, now, config, index)
}

/// Validate a batch sequentially, in input order.
///
/// The duplicate index is threaded through the whole batch, so a
/// record can duplicate an earlier record of the same batch as well as
/// anything the index remembers from before. Details preserve input
/// order; any reordering is the caller's concern.
pub fn validate_batch(
    records: Vec<InvoiceRecord>,
    now: DateTime<Utc>,
    config: &QcConfig,
    index: &dyn DuplicateIndex,
) -> BatchReport {
    let verdicts = records
        .into_iter()
        .map(|record| validate_record(record, now, config, index))
        .collect();
    finish(verdicts)
}

/// Validate a batch across the rayon thread pool.
///
/// Field and consistency rules are pure, and the index guarantees an
/// atomic check-and-insert, so this is safe. Which of two same-batch
/// duplicates is flagged is decided by whichever claims the key first;
/// that non-determinism is inherent to the parallel path. Details are
/// still returned in input order.
pub fn validate_batch_parallel(
    records: Vec<InvoiceRecord>,
    now: DateTime<Utc>,
    config: &QcConfig,
    index: &dyn DuplicateIndex,
) -> BatchReport {
    let verdicts = records
        .into_par_iter()
        .map(|record| validate_record(record, now, config, index))
        .collect();
    finish(verdicts)
}

/// Validate a raw JSON batch envelope (an array of record objects).
///
/// Malformed records are rejected individually and never abort the
/// batch; a malformed envelope is the one batch-level failure.
pub fn validate_json_batch(
    batch: &Value,
    now: DateTime<Utc>,
    config: &QcConfig,
    index: &dyn DuplicateIndex,
) -> Result<BatchReport, QcError> {
    let parsed = ingest::records_from_json(batch)?;
    let verdicts = parsed
        .into_iter()
        .map(|parsed| validate_parsed(parsed, now, config, index))
        .collect();
    Ok(finish(verdicts))
}

fn finish(verdicts: Vec<ValidationVerdict>) -> BatchReport {
    let report = BatchReport::from_verdicts(verdicts);
    debug!(
        total = report.summary.total,
        approved = report.summary.approved,
        warning = report.summary.warning,
        manual_review = report.summary.manual_review,
        rejected = report.summary.rejected,
        duplicate = report.summary.duplicate,
        "batch complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::InMemoryIndex;
    use crate::models::record::LineItem;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 1, 12, 0, 0).unwrap()
    }

    fn good_record(number: &str) -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: Some(number.to_string()),
            invoice_date: chrono::NaiveDate::from_ymd_opt(2023, 10, 27),
            vendor_name: Some("Acme".to_string()),
            vendor_tax_id: Some("US123".to_string()),
            total_net_amount: Decimal::from_str("1000.00").ok(),
            total_tax_amount: Decimal::from_str("150.00").ok(),
            total_amount_due: Decimal::from_str("1150.00").ok(),
            line_items: vec![LineItem::default()],
            ..Default::default()
        }
    }

    #[test]
    fn approved_record_claims_its_key() {
        let index = InMemoryIndex::new();
        let verdict = validate_record(good_record("INV-1"), now(), &QcConfig::default(), &index);
        assert_eq!(verdict.status, VerdictStatus::Approved);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn same_batch_duplicate_flagged_second() {
        let index = InMemoryIndex::new();
        let report = validate_batch(
            vec![good_record("INV-1"), good_record("INV-1")],
            now(),
            &QcConfig::default(),
            &index,
        );
        assert_eq!(report.details[0].status, VerdictStatus::Approved);
        assert_eq!(report.details[1].status, VerdictStatus::Duplicate);
        assert_eq!(report.summary.duplicate, 1);
    }

    #[test]
    fn empty_and_singleton_batches() {
        let index = InMemoryIndex::new();
        let report = validate_batch(Vec::new(), now(), &QcConfig::default(), &index);
        assert_eq!(report.summary.total, 0);
        assert!(report.details.is_empty());

        let report = validate_batch(vec![good_record("INV-1")], now(), &QcConfig::default(), &index);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.details.len(), 1);
    }

    #[test]
    fn details_preserve_input_order() {
        let index = InMemoryIndex::new();
        let records: Vec<_> = (0..20).map(|i| good_record(&format!("INV-{i}"))).collect();
        let report = validate_batch(records, now(), &QcConfig::default(), &index);
        for (i, verdict) in report.details.iter().enumerate() {
            assert_eq!(verdict.invoice_number, format!("INV-{i}"));
        }
    }

    #[test]
    fn parallel_batch_keeps_order_and_flags_one_duplicate() {
        let index = InMemoryIndex::new();
        let mut records: Vec<_> = (0..50).map(|i| good_record(&format!("INV-{i}"))).collect();
        records.push(good_record("INV-25"));

        let report =
            validate_batch_parallel(records, now(), &QcConfig::default(), &index);

        assert_eq!(report.summary.total, 51);
        assert_eq!(report.summary.duplicate, 1);
        // Either submission of INV-25 may win the key; exactly one loses.
        let dup_count = report
            .details
            .iter()
            .filter(|v| v.status == VerdictStatus::Duplicate)
            .count();
        assert_eq!(dup_count, 1);
        for (i, verdict) in report.details.iter().take(50).enumerate() {
            assert_eq!(verdict.invoice_number, format!("INV-{i}"));
        }
    }

    #[test]
    fn cross_batch_duplicate_with_shared_index() {
        let index = InMemoryIndex::new();
        let config = QcConfig::default();
        let first = validate_batch(vec![good_record("INV-1")], now(), &config, &index);
        assert_eq!(first.details[0].status, VerdictStatus::Approved);

        let second = validate_batch(vec![good_record("INV-1")], now(), &config, &index);
        assert_eq!(second.details[0].status, VerdictStatus::Duplicate);
    }

    #[test]
    fn independent_indices_are_idempotent() {
        let config = QcConfig::default();
        let records = vec![good_record("INV-1"), good_record("INV-2")];

        let a = validate_batch(records.clone(), now(), &config, &InMemoryIndex::new());
        let b = validate_batch(records, now(), &config, &InMemoryIndex::new());

        for (va, vb) in a.details.iter().zip(b.details.iter()) {
            assert_eq!(va.status, vb.status);
            assert_eq!(va.errors, vb.errors);
            assert_eq!(va.warnings, vb.warnings);
        }
    }

    #[test]
    fn record_without_key_components_is_exempt() {
        let index = InMemoryIndex::new();
        let record = InvoiceRecord {
            vendor_tax_id: None,
            ..good_record("INV-1")
        };
        // Same keyless record twice: neither is a duplicate.
        let report = validate_batch(
            vec![record.clone(), record],
            now(),
            &QcConfig::default(),
            &index,
        );
        assert_eq!(report.summary.duplicate, 0);
        assert_eq!(index.len(), 0);
        // Missing tax id with no address means manual review instead.
        assert_eq!(report.details[0].status, VerdictStatus::ManualReview);
    }
}
