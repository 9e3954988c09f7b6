//! Duplicate detection: composite key, index contract, in-memory store.

mod memory;

pub use memory::InMemoryIndex;

use chrono::{DateTime, Utc};

use crate::error::IndexError;
use crate::models::record::InvoiceRecord;

/// Composite identity of an invoice submission:
/// (vendor tax id, invoice number, fiscal year).
///
/// Components are normalized (trimmed, lowercased) so that formatting
/// noise from extraction does not defeat detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    vendor_tax_id: String,
    invoice_number: String,
    fiscal_year: i32,
}

impl DuplicateKey {
    /// Build the key for a record. Returns `None` when any component is
    /// missing; such records are exempt from duplicate detection (the
    /// completeness rules already flag the missing pieces).
    pub fn for_record(record: &InvoiceRecord) -> Option<Self> {
        let vendor_tax_id = record.vendor_tax_id()?.to_lowercase();
        let invoice_number = record.invoice_number()?.to_lowercase();
        let fiscal_year = record.effective_fiscal_year()?;
        Some(Self {
            vendor_tax_id,
            invoice_number,
            fiscal_year,
        })
    }

    /// Composite string form for external key-value stores.
    pub fn as_composite(&self) -> String {
        format!(
            "{}|{}|{}",
            self.vendor_tax_id, self.invoice_number, self.fiscal_year
        )
    }
}

/// Outcome of an atomic has-seen/mark-seen call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// First sighting; the key is now recorded.
    New,
    /// The key was already in the index.
    Seen,
}

/// Has-seen/mark-seen capability over duplicate keys.
///
/// `check_and_insert` must be atomic: a lookup and insert that are
/// separately visible would let two concurrent submissions of the same
/// key both pass as new. Implementations may be in-memory for one batch
/// or backed by a durable store for cross-batch protection; the engine
/// does not care which.
pub trait DuplicateIndex: Send + Sync {
    /// If `key` is unseen, record it with `seen_at` as its presence
    /// marker and return [`KeyDisposition::New`]; otherwise leave the
    /// index untouched and return [`KeyDisposition::Seen`].
    fn check_and_insert(
        &self,
        key: &DuplicateKey,
        seen_at: DateTime<Utc>,
    ) -> Result<KeyDisposition, IndexError>;
}
