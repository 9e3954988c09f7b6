//! Core library for invoice quality control.
//!
//! This crate provides:
//! - Invoice record and verdict models
//! - Field-presence and consistency rule checks
//! - Duplicate detection over a pluggable index
//! - Outcome classification and batch report assembly
//! - Lenient ingestion of raw extracted JSON
//!
//! The engine validates invoices that have already been extracted
//! elsewhere; it performs no extraction, no I/O, and never mutates its
//! input records.

pub mod classify;
pub mod dedupe;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod rules;

pub use error::{IndexError, QcError, Result};
pub use models::{
    BatchReport, BatchSummary, InvoiceRecord, LineItem, QcConfig, ValidationVerdict, VerdictStatus,
};
pub use classify::{DuplicateOutcome, DUPLICATE_MESSAGE};
pub use dedupe::{DuplicateIndex, DuplicateKey, InMemoryIndex, KeyDisposition};
pub use pipeline::{
    validate_batch, validate_batch_parallel, validate_json_batch, validate_parsed, validate_record,
};
