//! Lenient parsing of raw extracted JSON into invoice records.
//!
//! Extraction output is messy: amounts arrive as `"1,150.00"` or
//! `"$1150"`, dates in half a dozen formats, numbers sometimes as JSON
//! strings. This module normalizes what it can and reports what it
//! cannot. A present but unparseable monetary field is an error-tier
//! malformation (the record gets rejected without entering the rule
//! pipeline); a garbled date or fiscal year degrades to a warning and
//! an absent field, which the completeness rules then pick up.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::QcError;
use crate::models::record::{InvoiceRecord, LineItem};

/// Date formats accepted from extraction output, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d-%b-%Y",
];

/// A record parsed from raw JSON plus whatever went wrong on the way.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub record: InvoiceRecord,
    /// Malformations that make the record unprocessable (bad decimals).
    pub errors: Vec<String>,
    /// Degradations the rules should surface (unparseable dates).
    pub warnings: Vec<String>,
}

impl ParsedRecord {
    pub fn is_malformed(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a batch envelope: a JSON array of record objects.
pub fn records_from_json(batch: &Value) -> Result<Vec<ParsedRecord>, QcError> {
    let items = batch
        .as_array()
        .ok_or_else(|| QcError::MalformedBatch("expected a JSON array of records".to_string()))?;
    Ok(items.iter().map(record_from_json).collect())
}

/// Parse one raw record object, collecting malformations instead of
/// bailing out, so the batch always continues past a bad record.
pub fn record_from_json(value: &Value) -> ParsedRecord {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let Some(object) = value.as_object() else {
        return ParsedRecord {
            record: InvoiceRecord::default(),
            errors: vec!["Malformed record: expected a JSON object".to_string()],
            warnings,
        };
    };

    let mut record = InvoiceRecord {
        invoice_number: string_field(object.get("invoice_number")),
        vendor_name: string_field(object.get("vendor_name")),
        vendor_tax_id: string_field(object.get("vendor_tax_id")),
        vendor_address: string_field(object.get("vendor_address")),
        buyer_name: string_field(object.get("buyer_name")),
        po_number: string_field(object.get("po_number")),
        currency: string_field(object.get("currency")),
        ..Default::default()
    };

    for (name, slot) in [
        ("total_net_amount", &mut record.total_net_amount),
        ("total_tax_amount", &mut record.total_tax_amount),
        ("total_amount_due", &mut record.total_amount_due),
    ] {
        match parse_amount(object.get(name)) {
            Ok(amount) => *slot = amount,
            Err(raw) => errors.push(format!("Malformed {}: {:?} is not a valid amount", name, raw)),
        }
    }

    match parse_date(object.get("invoice_date")) {
        Ok(date) => record.invoice_date = date,
        Err(raw) => warnings.push(format!("Could not parse invoice_date: {:?}", raw)),
    }

    match parse_year(object.get("fiscal_year")) {
        Ok(year) => record.fiscal_year = year,
        Err(raw) => warnings.push(format!("Could not parse fiscal_year: {:?}", raw)),
    }

    match object.get("line_items") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            record.line_items = items.iter().map(line_item_from_json).collect();
        }
        Some(other) => {
            errors.push(format!(
                "Malformed line_items: expected an array, got {}",
                json_kind(other)
            ));
        }
    }

    ParsedRecord {
        record,
        errors,
        warnings,
    }
}

fn line_item_from_json(value: &Value) -> LineItem {
    let Some(object) = value.as_object() else {
        // Opaque entry; only its presence matters to the rules.
        return LineItem::default();
    };
    LineItem {
        description: string_field(object.get("description")),
        quantity: parse_amount(object.get("quantity")).unwrap_or(None),
        unit_price: parse_amount(object.get("unit_price")).unwrap_or(None),
        line_total: parse_amount(object.get("line_total")).unwrap_or(None),
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an amount from a JSON number or a string that may carry
/// currency symbols and thousands separators.
fn parse_amount(value: Option<&Value>) -> Result<Option<Decimal>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .map(Some)
            .map_err(|_| n.to_string()),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '$' | '€' | '£') && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(&cleaned).map(Some).map_err(|_| s.clone())
        }
        Some(other) => Err(json_kind(other).to_string()),
    }
}

fn parse_date(value: Option<&Value>) -> Result<Option<NaiveDate>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                    return Ok(Some(date));
                }
            }
            Err(s.to_string())
        }
        Some(other) => Err(json_kind(other).to_string()),
    }
}

fn parse_year(value: Option<&Value>) -> Result<Option<i32>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64().and_then(|y| i32::try_from(y).ok()) {
            Some(year) => Ok(Some(year)),
            None => Err(n.to_string()),
        },
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| s.clone()),
        Some(other) => Err(json_kind(other).to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
