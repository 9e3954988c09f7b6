//! Data models: invoice records, verdicts, reports, configuration.

pub mod config;
pub mod record;
pub mod report;

pub use config::QcConfig;
pub use record::{InvoiceRecord, LineItem};
pub use report::{BatchReport, BatchSummary, ValidationVerdict, VerdictStatus};
