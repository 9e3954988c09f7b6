//! End-to-end pipeline behavior over realistic batches.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

use invqc_core::dedupe::{DuplicateIndex, DuplicateKey, KeyDisposition};
use invqc_core::{
    validate_batch, validate_json_batch, validate_record, IndexError, InMemoryIndex, InvoiceRecord,
    LineItem, QcConfig, VerdictStatus, DUPLICATE_MESSAGE,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 1, 9, 0, 0).unwrap()
}

fn record(number: &str) -> InvoiceRecord {
    InvoiceRecord {
        invoice_number: Some(number.to_string()),
        invoice_date: NaiveDate::from_ymd_opt(2023, 10, 27),
        vendor_name: Some("Acme".to_string()),
        vendor_tax_id: Some("US123".to_string()),
        total_net_amount: Decimal::from_str("1000.00").ok(),
        total_tax_amount: Decimal::from_str("150.00").ok(),
        total_amount_due: Decimal::from_str("1150.00").ok(),
        line_items: vec![LineItem::default()],
        ..Default::default()
    }
}

/// Index stand-in for an unreachable external store.
struct OfflineIndex;

impl DuplicateIndex for OfflineIndex {
    fn check_and_insert(
        &self,
        _key: &DuplicateKey,
        _seen_at: DateTime<Utc>,
    ) -> Result<KeyDisposition, IndexError> {
        Err(IndexError::Unavailable("connection refused".to_string()))
    }
}

#[test]
fn errors_nonempty_iff_rejected_or_duplicate() {
    let index = InMemoryIndex::new();
    let config = QcConfig::default();
    let batch = vec![
        record("INV-1"),                                                 // approved
        InvoiceRecord { invoice_date: None, ..record("INV-2") },         // warning
        InvoiceRecord { invoice_number: None, ..record("INV-3") },      // rejected
        record("INV-1"),                                                 // duplicate
        InvoiceRecord {
            vendor_tax_id: None,
            vendor_address: None,
            ..record("INV-5")
        },                                                               // manual review
    ];

    let report = validate_batch(batch, now(), &config, &index);
    assert_eq!(report.summary.total, 5);

    for verdict in &report.details {
        let has_errors = !verdict.errors.is_empty();
        let error_tier = matches!(
            verdict.status,
            VerdictStatus::Rejected | VerdictStatus::Duplicate
        );
        assert_eq!(has_errors, error_tier, "status {:?}", verdict.status);
        assert_eq!(
            verdict.is_valid,
            matches!(verdict.status, VerdictStatus::Approved | VerdictStatus::Warning)
        );
    }
}

#[test]
fn reconciliation_tolerance_is_inclusive() {
    let index = InMemoryIndex::new();
    let config = QcConfig::default();

    let exact = InvoiceRecord {
        total_amount_due: Decimal::from_str("1150.00").ok(),
        ..record("INV-1")
    };
    assert_eq!(
        validate_record(exact, now(), &config, &index).status,
        VerdictStatus::Approved
    );

    let at_tolerance = InvoiceRecord {
        total_amount_due: Decimal::from_str("1150.05").ok(),
        ..record("INV-2")
    };
    assert_eq!(
        validate_record(at_tolerance, now(), &config, &index).status,
        VerdictStatus::Approved
    );

    let beyond = InvoiceRecord {
        total_amount_due: Decimal::from_str("1150.06").ok(),
        ..record("INV-3")
    };
    let verdict = validate_record(beyond, now(), &config, &index);
    assert_eq!(verdict.status, VerdictStatus::Warning);
    assert_eq!(
        verdict.warnings,
        vec!["Net + Tax does not equal Total Amount Due (expected 1150.00, got 1150.06)"]
    );
}

#[test]
fn date_window_boundaries() {
    let index = InMemoryIndex::new();
    let config = QcConfig::default();
    let today = now().date_naive();

    let tomorrow = InvoiceRecord {
        invoice_date: Some(today + Duration::days(1)),
        ..record("INV-1")
    };
    let verdict = validate_record(tomorrow, now(), &config, &index);
    assert_eq!(verdict.status, VerdictStatus::Warning);
    assert!(verdict
        .warnings
        .contains(&"Invoice date is in the future".to_string()));

    let year_old = InvoiceRecord {
        invoice_date: Some(today - Duration::days(365)),
        ..record("INV-2")
    };
    assert_eq!(
        validate_record(year_old, now(), &config, &index).status,
        VerdictStatus::Approved
    );

    let stale = InvoiceRecord {
        invoice_date: Some(today - Duration::days(366)),
        ..record("INV-3")
    };
    let verdict = validate_record(stale, now(), &config, &index);
    assert_eq!(verdict.status, VerdictStatus::Warning);
    assert!(verdict
        .warnings
        .contains(&"Invoice date is older than 365 days".to_string()));
}

#[test]
fn duplicate_carries_only_the_duplicate_message() {
    let index = InMemoryIndex::new();
    let config = QcConfig::default();

    // Second submission also has findings of its own; none may surface.
    let mut second = record("INV-1");
    second.invoice_date = None;
    second.total_net_amount = None;

    let report = validate_batch(vec![record("INV-1"), second], now(), &config, &index);
    assert_eq!(report.details[0].status, VerdictStatus::Approved);

    let dup = &report.details[1];
    assert_eq!(dup.status, VerdictStatus::Duplicate);
    assert_eq!(dup.errors, vec![DUPLICATE_MESSAGE.to_string()]);
    assert_eq!(dup.warnings, Vec::<String>::new());
}

#[test]
fn missing_mandatory_fields_reject_with_both_messages() {
    let index = InMemoryIndex::new();
    let rec = InvoiceRecord {
        invoice_number: None,
        total_amount_due: None,
        ..record("ignored")
    };
    let verdict = validate_record(rec, now(), &QcConfig::default(), &index);
    assert_eq!(verdict.status, VerdictStatus::Rejected);
    assert_eq!(
        verdict.errors,
        vec![
            "Invoice Number is missing".to_string(),
            "Total Amount Due is missing".to_string(),
        ]
    );
}

#[test]
fn unidentifiable_vendor_needs_review_even_when_consistent() {
    let index = InMemoryIndex::new();
    let rec = InvoiceRecord {
        vendor_tax_id: None,
        vendor_address: None,
        ..record("INV-1")
    };
    let verdict = validate_record(rec, now(), &QcConfig::default(), &index);
    assert_eq!(verdict.status, VerdictStatus::ManualReview);
    assert!(verdict.errors.is_empty());
}

#[test]
fn offline_index_forces_manual_review() {
    let verdict = validate_record(record("INV-1"), now(), &QcConfig::default(), &OfflineIndex);
    assert_eq!(verdict.status, VerdictStatus::ManualReview);
    assert_eq!(
        verdict.warnings,
        vec!["Duplicate check skipped: duplicate index unavailable: connection refused"]
    );
}

#[test]
fn json_batch_rejects_malformed_records_and_continues() {
    let index = InMemoryIndex::new();
    let batch = json!([
        {
            "invoice_number": "INV-001",
            "invoice_date": "2023-10-27",
            "vendor_name": "Acme",
            "vendor_tax_id": "US123",
            "total_net_amount": "1000.00",
            "total_tax_amount": "150.00",
            "total_amount_due": "1150.00",
            "line_items": [{"description": "Widget"}],
        },
        {
            "invoice_number": "INV-002",
            "total_amount_due": "not a number",
        },
        {
            "invoice_number": "INV-003",
            "invoice_date": "2023-10-29",
            "vendor_name": "Beta Corp",
            "vendor_address": "9 Side St",
            "total_net_amount": "80.00",
            "total_tax_amount": "10.00",
            "total_amount_due": "100.00",
            "line_items": [{"description": "Gadget"}],
        },
    ]);

    let report = validate_json_batch(&batch, now(), &QcConfig::default(), &index).unwrap();
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.details[0].status, VerdictStatus::Approved);

    let malformed = &report.details[1];
    assert_eq!(malformed.status, VerdictStatus::Rejected);
    assert_eq!(
        malformed.errors,
        vec!["Malformed total_amount_due: \"not a number\" is not a valid amount"]
    );

    // 80 + 10 != 100, beyond tolerance.
    let mismatch = &report.details[2];
    assert_eq!(mismatch.status, VerdictStatus::Warning);
    assert_eq!(
        mismatch.warnings,
        vec!["Net + Tax does not equal Total Amount Due (expected 90.00, got 100.00)"]
    );
}

#[test]
fn malformed_envelope_is_a_batch_level_failure() {
    let index = InMemoryIndex::new();
    let err = validate_json_batch(&json!({"oops": 1}), now(), &QcConfig::default(), &index)
        .unwrap_err();
    assert!(err.to_string().contains("malformed batch"));
}

#[test]
fn report_serializes_to_the_documented_shape() {
    let index = InMemoryIndex::new();
    let report = validate_batch(vec![record("INV-1")], now(), &QcConfig::default(), &index);
    let value = serde_json::to_value(&report).unwrap();

    let summary = &value["summary"];
    for field in [
        "total",
        "approved",
        "warning",
        "manual_review",
        "rejected",
        "duplicate",
    ] {
        assert!(summary.get(field).is_some(), "summary.{field}");
    }
    let detail = &value["details"][0];
    assert_eq!(detail["invoice_number"], "INV-1");
    assert_eq!(detail["status"], "APPROVED");
    assert_eq!(detail["is_valid"], true);
    assert!(detail["original_data"].is_object());
    assert!(detail["errors"].as_array().unwrap().is_empty());
}
